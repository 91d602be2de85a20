//! Every service method against a catch-all stub: method, path and query
//! must match the backend's route table.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde_json::{Value, json};

use learnhub_auth::{Role, SessionStore, UserRecord};
use learnhub_client::models::{FileUpload, ListParams, PasswordChange, RegisterRequest, ReportRange};
use learnhub_client::{ApiClient, ClientConfig};
use learnhub_core::{
    CertificateId, CourseId, CourseLevel, LessonId, LessonType, QuizId, UserId, UserStatus,
};
use learnhub_validation::forms::{CourseForm, LessonForm, ProfileForm, ReviewForm};

const PDF: &[u8] = b"%PDF-1.4 certificate";
const PAGING: &str = "page=1&limit=10&sort=created_at";
const RANGE: &str = "startDate=2024-01-01&endDate=2024-01-31";

#[derive(Debug, Clone)]
struct Hit {
    method: Method,
    path: String,
    query: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

impl Hit {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Recorder {
    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    fn find(&self, method: Method, path: &str) -> Hit {
        self.hits()
            .into_iter()
            .find(|h| h.method == method && h.path == path)
            .unwrap_or_else(|| panic!("no {method} {path}"))
    }
}

/// A body every typed response in the client can decode.
fn generic_body() -> Value {
    json!({
        "id": 1,
        "title": "t",
        "email": "e@x.io",
        "rating": 5,
        "items": [],
        "user": { "id": 1, "email": "e@x.io" },
        "token": "t"
    })
}

async fn record_any(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let download = path.ends_with("/download");
    recorder.hits.lock().unwrap().push(Hit {
        method,
        path,
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if download {
        ([(header::CONTENT_TYPE, "application/pdf")], PDF).into_response()
    } else {
        axum::Json(generic_body()).into_response()
    }
}

struct TestServer {
    base_url: String,
    recorder: Recorder,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .fallback(record_any)
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            recorder,
            handle,
        }
    }

    fn client(&self) -> ApiClient {
        let store = SessionStore::in_memory();
        store.login(UserRecord::new("1", "e@x.io", Role::ADMIN), "tok");
        let config = ClientConfig::default().with_base_url(self.base_url.clone());
        ApiClient::new(&config, Arc::new(store)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn course_form() -> CourseForm {
    CourseForm {
        title: "Systems Rust".into(),
        description: "Ownership and borrowing, in depth.".into(),
        category: "programming".into(),
        level: CourseLevel::Beginner,
        price: 0.0,
        duration: 90.0,
        instructor: "1".into(),
        image: None,
        tags: None,
    }
}

fn lesson_form() -> LessonForm {
    LessonForm {
        title: "Borrowing".into(),
        description: None,
        content: "References and lifetimes".into(),
        lesson_type: LessonType::Video,
        video_url: None,
        duration: Some(12.0),
        order: 1.0,
    }
}

fn range() -> ReportRange {
    ReportRange {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
    }
}

#[tokio::test]
async fn every_service_method_hits_its_route() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let params = ListParams::default();
    let course = CourseId::new("7");
    let lesson = LessonId::new("3");
    let quiz = QuizId::new("4");
    let user = UserId::new("9");

    let auth = client.auth();
    auth.login("e@x.io", "Secret123").await.unwrap();
    auth.register(&RegisterRequest {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        password: "Abcdefgh1".into(),
    })
    .await
    .unwrap();
    auth.me().await.unwrap();
    auth.update_user(&user, &json!({ "bio": "x" })).await.unwrap();
    auth.change_password(
        &user,
        &PasswordChange {
            current_password: "Old12345".into(),
            new_password: "New12345".into(),
        },
    )
    .await
    .unwrap();
    auth.refresh_token().await.unwrap();
    auth.verify_email("vt").await.unwrap();
    auth.resend_verification("e@x.io").await.unwrap();
    auth.forgot_password("e@x.io").await.unwrap();
    auth.reset_password("rt", "New12345").await.unwrap();
    auth.logout().await.unwrap();

    let courses = client.courses();
    courses.list(&params).await.unwrap();
    courses.get(&course).await.unwrap();
    courses.content(&course).await.unwrap();
    courses.create(&course_form()).await.unwrap();
    courses.update(&course, &course_form()).await.unwrap();
    courses.delete(&course).await.unwrap();
    courses
        .upload_thumbnail(&course, FileUpload::new("cover.png", vec![1, 2, 3]).with_content_type("image/png"))
        .await
        .unwrap();
    courses.lessons(&course).await.unwrap();
    courses.lesson(&course, &lesson).await.unwrap();
    courses.create_lesson(&course, &lesson_form()).await.unwrap();
    courses.update_lesson(&course, &lesson, &lesson_form()).await.unwrap();
    courses.delete_lesson(&course, &lesson).await.unwrap();
    courses.quizzes(&course).await.unwrap();
    courses.quiz(&course, &quiz).await.unwrap();
    courses
        .submit_quiz(&course, &quiz, vec![json!(0), json!(2)])
        .await
        .unwrap();
    courses.enroll(&course).await.unwrap();
    courses.progress(&course).await.unwrap();
    courses.complete_lesson(&course, &lesson).await.unwrap();
    courses.reviews(&course, &params).await.unwrap();
    courses
        .create_review(&course, &ReviewForm { rating: 5.0, comment: "Great course".into() })
        .await
        .unwrap();
    courses.by_instructor(&user, &params).await.unwrap();

    let users = client.users();
    users.list(&params).await.unwrap();
    users.get(&user).await.unwrap();
    users.profile().await.unwrap();
    users
        .update_profile(&ProfileForm {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            phone: None,
            bio: None,
            avatar: None,
            specialization: None,
        })
        .await
        .unwrap();
    users
        .upload_avatar(FileUpload::new("me.jpg", vec![9; 16]))
        .await
        .unwrap();
    users.enrolled_courses(&params).await.unwrap();
    users.learning_stats().await.unwrap();
    users.certificates().await.unwrap();
    let pdf = users
        .download_certificate(&CertificateId::new("c5"))
        .await
        .unwrap();
    assert_eq!(pdf, PDF);
    users.update_role(&user, Role::INSTRUCTOR).await.unwrap();
    users.update_status(&user, UserStatus::Suspended).await.unwrap();
    users.delete(&user).await.unwrap();

    let analytics = client.analytics();
    analytics.instructor_stats().await.unwrap();
    analytics.course(&course).await.unwrap();
    analytics.engagement(&course, &range()).await.unwrap();
    analytics.revenue(&range()).await.unwrap();
    analytics.admin_stats().await.unwrap();
    analytics.platform_stats().await.unwrap();
    analytics.user_activity(&range()).await.unwrap();

    let expected: &[(Method, &str, Option<&str>)] = &[
        (Method::POST, "/auth/login", None),
        (Method::POST, "/auth/register", None),
        (Method::GET, "/auth/me", None),
        (Method::PUT, "/auth/users/9", None),
        (Method::PUT, "/auth/users/9/password", None),
        (Method::POST, "/auth/refresh", None),
        (Method::POST, "/auth/verify-email", None),
        (Method::POST, "/auth/resend-verification", None),
        (Method::POST, "/auth/forgot-password", None),
        (Method::POST, "/auth/reset-password", None),
        (Method::POST, "/auth/logout", None),
        (Method::GET, "/courses", Some(PAGING)),
        (Method::GET, "/courses/7", None),
        (Method::GET, "/courses/7/content", None),
        (Method::POST, "/courses", None),
        (Method::PUT, "/courses/7", None),
        (Method::DELETE, "/courses/7", None),
        (Method::POST, "/courses/7/thumbnail", None),
        (Method::GET, "/courses/7/lessons", None),
        (Method::GET, "/courses/7/lessons/3", None),
        (Method::POST, "/courses/7/lessons", None),
        (Method::PUT, "/courses/7/lessons/3", None),
        (Method::DELETE, "/courses/7/lessons/3", None),
        (Method::GET, "/courses/7/quizzes", None),
        (Method::GET, "/courses/7/quizzes/4", None),
        (Method::POST, "/courses/7/quizzes/4/submit", None),
        (Method::POST, "/courses/7/enroll", None),
        (Method::GET, "/courses/7/progress", None),
        (Method::POST, "/courses/7/lessons/3/complete", None),
        (Method::GET, "/courses/7/reviews", Some(PAGING)),
        (Method::POST, "/courses/7/reviews", None),
        (Method::GET, "/instructors/9/courses", Some(PAGING)),
        (Method::GET, "/users", Some(PAGING)),
        (Method::GET, "/users/9", None),
        (Method::GET, "/users/profile", None),
        (Method::PUT, "/users/profile", None),
        (Method::POST, "/users/profile/avatar", None),
        (Method::GET, "/users/enrolled-courses", Some(PAGING)),
        (Method::GET, "/users/learning-stats", None),
        (Method::GET, "/users/certificates", None),
        (Method::GET, "/users/certificates/c5/download", None),
        (Method::PUT, "/users/9/role", None),
        (Method::PUT, "/users/9/status", None),
        (Method::DELETE, "/users/9", None),
        (Method::GET, "/analytics/instructor/stats", None),
        (Method::GET, "/analytics/courses/7", None),
        (Method::GET, "/analytics/courses/7/engagement", Some(RANGE)),
        (Method::GET, "/analytics/revenue", Some(RANGE)),
        (Method::GET, "/analytics/admin/stats", None),
        (Method::GET, "/analytics/platform/stats", None),
        (Method::GET, "/analytics/user-activity", Some(RANGE)),
    ];

    let seen: Vec<(Method, String, Option<String>)> = srv
        .recorder
        .hits()
        .into_iter()
        .map(|h| (h.method, h.path, h.query))
        .collect();
    let wanted: Vec<(Method, String, Option<String>)> = expected
        .iter()
        .map(|(m, p, q)| (m.clone(), p.to_string(), q.map(str::to_string)))
        .collect();
    assert_eq!(seen, wanted);
}

#[tokio::test]
async fn request_bodies_carry_the_backend_field_names() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let course = CourseId::new("7");
    let quiz = QuizId::new("4");
    let user = UserId::new("9");

    client
        .courses()
        .submit_quiz(&course, &quiz, vec![json!(1), json!("b")])
        .await
        .unwrap();
    client.users().update_role(&user, Role::ADMIN).await.unwrap();
    client
        .users()
        .update_status(&user, UserStatus::Inactive)
        .await
        .unwrap();
    client.courses().create_lesson(&course, &lesson_form()).await.unwrap();
    client.auth().reset_password("rt", "New12345").await.unwrap();

    let rec = &srv.recorder;
    assert_eq!(
        rec.find(Method::POST, "/courses/7/quizzes/4/submit").json(),
        json!({ "answers": [1, "b"] })
    );
    assert_eq!(rec.find(Method::PUT, "/users/9/role").json(), json!({ "role": "admin" }));
    assert_eq!(
        rec.find(Method::PUT, "/users/9/status").json(),
        json!({ "status": "inactive" })
    );
    let lesson = rec.find(Method::POST, "/courses/7/lessons").json();
    assert_eq!(lesson["type"], "video");
    assert!(lesson.get("videoUrl").is_none());
    assert_eq!(
        rec.find(Method::POST, "/auth/reset-password").json(),
        json!({ "token": "rt", "newPassword": "New12345" })
    );
}

#[tokio::test]
async fn uploads_are_multipart_under_their_field_names() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    client
        .courses()
        .upload_thumbnail(
            &CourseId::new("7"),
            FileUpload::new("cover.png", b"png-bytes".to_vec()).with_content_type("image/png"),
        )
        .await
        .unwrap();
    client
        .users()
        .upload_avatar(FileUpload::new("me.jpg", b"jpg-bytes".to_vec()))
        .await
        .unwrap();

    let thumbnail = srv.recorder.find(Method::POST, "/courses/7/thumbnail");
    assert!(
        thumbnail
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary="))
    );
    let text = thumbnail.text();
    assert!(text.contains(r#"name="thumbnail""#));
    assert!(text.contains(r#"filename="cover.png""#));
    assert!(text.contains("image/png"));
    assert!(text.contains("png-bytes"));

    let avatar = srv.recorder.find(Method::POST, "/users/profile/avatar");
    assert!(
        avatar
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    );
    assert!(avatar.text().contains(r#"name="avatar""#));
    assert!(avatar.text().contains("jpg-bytes"));
}

#[tokio::test]
async fn failed_download_reports_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(|| async {
        (
            axum::http::StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "Certificate not found" })),
        )
    });
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::default().with_base_url(format!("http://{addr}/api"));
    let client = ApiClient::new(&config, Arc::new(SessionStore::in_memory())).unwrap();
    let err = client
        .users()
        .download_certificate(&CertificateId::new("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("Download failed"), "Certificate not found");
    handle.abort();
}
