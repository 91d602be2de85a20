//! `/courses/*` endpoints.

use reqwest::multipart::Form;
use serde_json::Value;

use learnhub_core::{CourseId, LessonId, QuizId, UserId};
use learnhub_validation::forms::{CourseForm, LessonForm, ReviewForm};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{
    Course, FileUpload, Lesson, ListParams, Listing, Progress, Quiz, QuizSubmission, Review,
};

#[derive(Debug, Clone, Copy)]
pub struct CourseApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl CourseApi<'_> {
    pub async fn list(&self, params: &ListParams) -> Result<Listing<Course>, ApiError> {
        self.client.get_with("/courses", params).await
    }

    pub async fn get(&self, id: &CourseId) -> Result<Course, ApiError> {
        self.client.get(&format!("/courses/{id}")).await
    }

    pub async fn content(&self, id: &CourseId) -> Result<Value, ApiError> {
        self.client.get(&format!("/courses/{id}/content")).await
    }

    pub async fn create(&self, form: &CourseForm) -> Result<Course, ApiError> {
        self.client.post("/courses", form).await
    }

    pub async fn update(&self, id: &CourseId, form: &CourseForm) -> Result<Course, ApiError> {
        self.client.put(&format!("/courses/{id}"), form).await
    }

    pub async fn delete(&self, id: &CourseId) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&format!("/courses/{id}"))
            .await
            .map(drop)
    }

    /// Multipart upload under the `thumbnail` field.
    pub async fn upload_thumbnail(&self, id: &CourseId, file: FileUpload) -> Result<Value, ApiError> {
        let form = Form::new().part("thumbnail", file.into_part()?);
        self.client
            .post_multipart(&format!("/courses/{id}/thumbnail"), form)
            .await
    }

    pub async fn lessons(&self, id: &CourseId) -> Result<Listing<Lesson>, ApiError> {
        self.client.get(&format!("/courses/{id}/lessons")).await
    }

    pub async fn lesson(&self, id: &CourseId, lesson: &LessonId) -> Result<Lesson, ApiError> {
        self.client
            .get(&format!("/courses/{id}/lessons/{lesson}"))
            .await
    }

    pub async fn create_lesson(&self, id: &CourseId, form: &LessonForm) -> Result<Lesson, ApiError> {
        self.client
            .post(&format!("/courses/{id}/lessons"), form)
            .await
    }

    pub async fn update_lesson(
        &self,
        id: &CourseId,
        lesson: &LessonId,
        form: &LessonForm,
    ) -> Result<Lesson, ApiError> {
        self.client
            .put(&format!("/courses/{id}/lessons/{lesson}"), form)
            .await
    }

    pub async fn delete_lesson(&self, id: &CourseId, lesson: &LessonId) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&format!("/courses/{id}/lessons/{lesson}"))
            .await
            .map(drop)
    }

    pub async fn quizzes(&self, id: &CourseId) -> Result<Listing<Quiz>, ApiError> {
        self.client.get(&format!("/courses/{id}/quizzes")).await
    }

    pub async fn quiz(&self, id: &CourseId, quiz: &QuizId) -> Result<Quiz, ApiError> {
        self.client
            .get(&format!("/courses/{id}/quizzes/{quiz}"))
            .await
    }

    pub async fn submit_quiz(
        &self,
        id: &CourseId,
        quiz: &QuizId,
        answers: Vec<Value>,
    ) -> Result<Value, ApiError> {
        self.client
            .post(
                &format!("/courses/{id}/quizzes/{quiz}/submit"),
                &QuizSubmission { answers },
            )
            .await
    }

    pub async fn enroll(&self, id: &CourseId) -> Result<Value, ApiError> {
        self.client.post_empty(&format!("/courses/{id}/enroll")).await
    }

    pub async fn progress(&self, id: &CourseId) -> Result<Progress, ApiError> {
        self.client.get(&format!("/courses/{id}/progress")).await
    }

    pub async fn complete_lesson(&self, id: &CourseId, lesson: &LessonId) -> Result<Value, ApiError> {
        self.client
            .post_empty(&format!("/courses/{id}/lessons/{lesson}/complete"))
            .await
    }

    pub async fn reviews(&self, id: &CourseId, params: &ListParams) -> Result<Listing<Review>, ApiError> {
        self.client
            .get_with(&format!("/courses/{id}/reviews"), params)
            .await
    }

    pub async fn create_review(&self, id: &CourseId, form: &ReviewForm) -> Result<Review, ApiError> {
        self.client
            .post(&format!("/courses/{id}/reviews"), form)
            .await
    }

    pub async fn by_instructor(
        &self,
        instructor: &UserId,
        params: &ListParams,
    ) -> Result<Listing<Course>, ApiError> {
        self.client
            .get_with(&format!("/instructors/{instructor}/courses"), params)
            .await
    }
}
