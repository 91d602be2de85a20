//! The platform's form schemas and the typed records they validate into.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use learnhub_core::{CourseLevel, LessonType, QuizType};

use crate::schema::{Field, Schema};

const INVALID_EMAIL: &str = "Invalid email address";
const PASSWORD_MIN: &str = "Password must be at least 8 characters";
const PASSWORD_UPPER: &str = "Password must contain at least one uppercase letter";
const PASSWORD_LOWER: &str = "Password must contain at least one lowercase letter";
const PASSWORD_DIGIT: &str = "Password must contain at least one number";
const PASSWORDS_DIFFER: &str = "Passwords do not match";

/// Password policy shared by registration and password change.
fn strong_password(name: &'static str) -> Field {
    Field::text(name)
        .min_len(8, PASSWORD_MIN)
        .pattern("[A-Z]", PASSWORD_UPPER)
        .pattern("[a-z]", PASSWORD_LOWER)
        .pattern("[0-9]", PASSWORD_DIGIT)
}

fn name_field(name: &'static str, message: &'static str) -> Field {
    Field::text(name).min_len(2, message)
}

static LOGIN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("login")
        .field(Field::text("email").email(INVALID_EMAIL))
        .field(Field::text("password").min_len(6, "Password must be at least 6 characters"))
});

static REGISTER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("register")
        .field(name_field("firstName", "First name must be at least 2 characters"))
        .field(name_field("lastName", "Last name must be at least 2 characters"))
        .field(Field::text("email").email(INVALID_EMAIL))
        .field(strong_password("password"))
        .field(Field::text("confirmPassword"))
        .field(
            Field::boolean("agreeToTerms")
                .must_be_true("You must agree to the terms and conditions"),
        )
        .must_match("password", "confirmPassword", "confirmPassword", PASSWORDS_DIFFER)
});

static COURSE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("course")
        .field(
            Field::text("title")
                .min_len(3, "Title must be at least 3 characters")
                .max_len(255, "Title is too long"),
        )
        .field(
            Field::text("description")
                .min_len(10, "Description must be at least 10 characters")
                .max_len(2000, "Description is too long"),
        )
        .field(Field::text("category").min_len(1, "Category is required"))
        .field(Field::choice("level", &CourseLevel::wire_values()))
        .field(Field::number("price").min(0.0, "Price cannot be negative"))
        .field(Field::number("duration").min(1.0, "Duration must be at least 1 minute"))
        .field(Field::text("instructor").min_len(1, "Instructor is required"))
        .field(Field::upload("image").optional().type_message("Image is required"))
        .field(Field::list("tags", Field::text("tag")).optional())
});

static LESSON: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("lesson")
        .field(Field::text("title").min_len(3, "Title must be at least 3 characters"))
        .field(
            Field::text("description")
                .optional()
                .min_len(10, "Description must be at least 10 characters"),
        )
        .field(Field::text("content").min_len(1, "Content is required"))
        .field(Field::choice("type", &LessonType::wire_values()))
        .field(Field::text("videoUrl").optional().url("Invalid video URL"))
        .field(Field::number("duration").optional().positive("Duration must be positive"))
        .field(Field::number("order").positive("Order must be positive"))
});

static QUIZ: LazyLock<Schema> = LazyLock::new(|| {
    let question = Field::object(
        "question",
        vec![
            Field::text("question").min_len(1, "Question is required"),
            Field::list("options", Field::text("option")).min_items(2, "At least 2 options required"),
            Field::number("correctAnswer").min(0.0, "Correct answer is required"),
        ],
    );

    Schema::new("quiz")
        .field(Field::text("title").min_len(3, "Title must be at least 3 characters"))
        .field(
            Field::text("description")
                .optional()
                .min_len(10, "Description must be at least 10 characters"),
        )
        .field(Field::choice("type", &QuizType::wire_values()))
        .field(Field::list("questions", question).min_items(1, "At least one question is required"))
        .field(
            Field::number("passingScore")
                .min(0.0, "Number must be greater than or equal to 0")
                .max(100.0, "Passing score must be between 0 and 100"),
        )
        .field(Field::number("timeLimit").optional().positive("Time limit must be positive"))
});

static PROFILE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("profile")
        .field(name_field("firstName", "First name must be at least 2 characters"))
        .field(name_field("lastName", "Last name must be at least 2 characters"))
        .field(Field::text("email").email(INVALID_EMAIL))
        .field(Field::text("phone").optional())
        .field(Field::text("bio").optional().max_len(500, "Bio is too long"))
        .field(Field::upload("avatar").optional())
        .field(Field::text("specialization").optional())
});

static REVIEW: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("review")
        .field(
            Field::number("rating")
                .min(1.0, "Rating is required")
                .max(5.0, "Rating must be between 1 and 5"),
        )
        .field(
            Field::text("comment")
                .min_len(10, "Comment must be at least 10 characters")
                .max_len(500, "Comment is too long"),
        )
});

static CHANGE_PASSWORD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("change_password")
        .field(Field::text("currentPassword").min_len(6, "Password is required"))
        .field(strong_password("newPassword"))
        .field(Field::text("confirmPassword"))
        .must_match("newPassword", "confirmPassword", "confirmPassword", PASSWORDS_DIFFER)
        .must_differ(
            "currentPassword",
            "newPassword",
            "newPassword",
            "New password must be different from current password",
        )
});

pub fn login() -> &'static Schema {
    &LOGIN
}

pub fn register() -> &'static Schema {
    &REGISTER
}

pub fn course() -> &'static Schema {
    &COURSE
}

pub fn lesson() -> &'static Schema {
    &LESSON
}

pub fn quiz() -> &'static Schema {
    &QUIZ
}

pub fn profile() -> &'static Schema {
    &PROFILE
}

pub fn review() -> &'static Schema {
    &REVIEW
}

pub fn change_password() -> &'static Schema {
    &CHANGE_PASSWORD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub price: f64,
    pub duration: f64,
    pub instructor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonForm {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionForm {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizForm {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub questions: Vec<QuizQuestionForm>,
    pub passing_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewForm {
    pub rating: f64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
