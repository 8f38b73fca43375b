//! Typed wrappers for the backend's auth and photo endpoints.

pub mod auth;
pub mod photos;

pub use auth::AuthApi;
pub use photos::PhotoApi;

/// Backend endpoint paths.
pub mod paths {
    pub const CSRF: &str = "/api/csrf";
    pub const LOGIN: &str = "/api/auth/login";
    pub const SIGNUP: &str = "/api/auth/signup";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const REFRESH: &str = "/api/auth/refresh";
    pub const ME: &str = "/api/auth/me";
    pub const FORGOT_PASSWORD: &str = "/api/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/api/auth/reset-password";
    pub const VERIFY_EMAIL: &str = "/api/auth/verify-email";
    pub const RESEND_VERIFICATION: &str = "/api/auth/resend-verification";
    pub const PHOTOS: &str = "/api/photos";
    pub const PHOTO_SEARCH: &str = "/api/photos/search";
    pub const SEARCH_HISTORY: &str = "/api/search-history";
}
