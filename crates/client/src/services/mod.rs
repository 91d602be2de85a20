//! Typed endpoint groups over [`ApiClient`].
//!
//! Each group is a cheap borrow of the client: `client.courses().get(&id)`.

pub mod analytics;
pub mod auth;
pub mod courses;
pub mod users;

use crate::http::ApiClient;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use courses::CourseApi;
pub use users::UserApi;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn courses(&self) -> CourseApi<'_> {
        CourseApi { client: self }
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi { client: self }
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi { client: self }
    }
}
