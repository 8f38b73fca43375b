//! CLI photo command handlers.

use super::PhotoCommands;
use crate::client::LumoClient;
use crate::types::{Photo, SearchResult};

/// Dispatch a `lumo photos …` command.
pub async fn handle(
    client: &LumoClient,
    command: PhotoCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let photos = client.photos();
    match command {
        PhotoCommands::List => {
            let collection = photos.collection().await?;
            if collection.is_empty() {
                println!("Your collection is empty.");
            }
            for photo in &collection {
                print_photo(photo);
            }
        }
        PhotoCommands::Show { id } => {
            let detail = photos.photo(&id).await?;
            print_photo(&detail.photo);
            if !detail.photo.color_palette.is_empty() {
                println!("   palette: {}", detail.photo.color_palette.join(" "));
            }
            if !detail.recommendations.is_empty() {
                println!("\nRecommended:");
                for hit in &detail.recommendations {
                    print_hit(hit);
                }
            }
        }
        PhotoCommands::Search { query } => {
            let hits = photos.search(&query).await?;
            if hits.is_empty() {
                println!("No results for \"{query}\".");
            }
            for hit in &hits {
                print_hit(hit);
            }
        }
        PhotoCommands::Save { image_url } => {
            photos.save(&image_url).await?;
            println!("✅ Added to your collection");
        }
        PhotoCommands::Tag { id, tag, kind } => {
            let stored = photos.add_tag(&id, &tag, kind).await?;
            println!("✅ Tagged {id} with \"{stored}\" ({kind})");
        }
        PhotoCommands::Untag { id, tag } => {
            photos.remove_tag(&id, &tag).await?;
            println!("✅ Removed \"{}\" from {id}", tag.trim());
        }
        PhotoCommands::History => {
            for item in photos.history().await? {
                println!(
                    "{}  {}",
                    item.created_at.format("%Y-%m-%d %H:%M"),
                    item.query
                );
            }
        }
    }
    Ok(())
}

fn print_photo(photo: &Photo) {
    println!("📷 {}  {}", photo.id, photo.image_url);
    let tags: Vec<&str> = photo.tags().collect();
    if !tags.is_empty() {
        println!("   tags: {}", tags.join(", "));
    }
}

fn print_hit(hit: &SearchResult) {
    println!("{:>6.3}  {}", hit.score, hit.image_url);
}
