mod common;

use client_lib::adapters::{
    ApiClient, RestApplicationsAdapter, RestAuthAdapter, RestHrAdapter, RestJobsAdapter,
    RestResumesAdapter,
};
use common::{application_json, cv_from_request, spawn};
use jobmate_core::domain::{
    AnalyticsFilters, ApplicationStatus, ApplicationUpdate, CvData, JobQuery, JobStatus,
    LoginCredentials, UserProfile,
};
use jobmate_core::persistence::MemoryStore;
use jobmate_core::ports::{
    ApplicationService, AuthService, CvGenerationService, HrService, JobService, KeyValueStore,
    PortError,
};
use jobmate_core::session::SessionHandle;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn signed_in_client(url: &str) -> (ApiClient, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let session = SessionHandle::load(store.clone());
    session.set_auth(
        UserProfile {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        },
        "tok-123".into(),
    );
    let client = ApiClient::new(url, Duration::from_secs(5), session).unwrap();
    (client, store)
}

fn saved_cv(id: Option<&str>) -> CvData {
    let mut value = json!({
        "personalInfo": {
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "",
            "location": "London, UK"
        },
        "professionalSummary": "Mathematician.",
        "workExperience": [{
            "id": "w1", "jobTitle": "Analyst", "company": "Babbage & Co",
            "location": "London", "startDate": "1842-01", "description": "", "achievements": []
        }],
        "education": [{
            "id": "e1", "degree": "Mathematics", "institution": "Private tutoring",
            "location": "London", "graduationDate": "1835"
        }],
        "skills": ["Math"],
        "template": "modern"
    });
    if let Some(id) = id {
        value["id"] = json!(id);
    }
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let backend = spawn(|_| (200, json!([application_json("a1", "Interview Scheduled")]))).await;
    let (client, _) = signed_in_client(&backend.url);

    let applications = RestApplicationsAdapter::new(client)
        .list_applications()
        .await
        .unwrap();

    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].status, ApplicationStatus::InterviewScheduled);
    let request = backend.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/applications");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn signed_out_requests_have_no_authorization_header() {
    let backend = spawn(|_| (200, json!([]))).await;
    let session = SessionHandle::load(Arc::new(MemoryStore::new()));
    let client = ApiClient::new(&backend.url, Duration::from_secs(5), session).unwrap();

    RestJobsAdapter::new(client)
        .list_jobs(&JobQuery::default())
        .await
        .unwrap();

    assert_eq!(backend.last().authorization, None);
}

#[tokio::test]
async fn unauthorized_response_clears_the_persisted_session() {
    let backend = spawn(|_| (401, json!({ "detail": "Token expired" }))).await;
    let (client, store) = signed_in_client(&backend.url);
    let session = client.session().clone();

    let err = RestApplicationsAdapter::new(client)
        .list_applications()
        .await
        .unwrap_err();

    assert_eq!(err, PortError::Unauthorized(Some("Token expired".into())));
    assert!(!session.is_authenticated());
    assert!(!SessionHandle::load(store).is_authenticated());
}

#[tokio::test]
async fn failures_map_onto_the_error_taxonomy() {
    let backend = spawn(|request| match request.path.as_str() {
        "/applications/missing" => (404, json!({ "detail": "Application not found" })),
        "/applications/bad" => (
            422,
            json!({ "detail": [{ "loc": ["body", "status"], "msg": "invalid status" }] }),
        ),
        _ => (503, serde_json::Value::Null),
    })
    .await;
    let (client, _) = signed_in_client(&backend.url);
    let applications = RestApplicationsAdapter::new(client);

    let err = applications.get_application("missing").await.unwrap_err();
    assert_eq!(err, PortError::NotFound("Application not found".into()));

    let err = applications
        .update_application("bad", &ApplicationUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PortError::Api {
            status: 422,
            detail: Some("invalid status".into())
        }
    );

    let err = applications.delete_application("a1").await.unwrap_err();
    assert_eq!(err, PortError::Api { status: 503, detail: None });
    assert_eq!(err.user_message("Failed to delete"), "Failed to delete");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let (client, _) = signed_in_client("http://127.0.0.1:1");
    let err = RestApplicationsAdapter::new(client)
        .list_applications()
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Transport(_)));
}

#[tokio::test]
async fn patch_serializes_only_the_fields_that_changed() {
    let backend = spawn(|_| (200, application_json("a1", "Rejected"))).await;
    let (client, _) = signed_in_client(&backend.url);
    let update = ApplicationUpdate {
        status: Some(ApplicationStatus::Rejected),
        ..Default::default()
    };

    let updated = RestApplicationsAdapter::new(client)
        .update_application("a1", &update)
        .await
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Rejected);
    let request = backend.last();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.path, "/applications/a1");
    assert_eq!(request.json(), json!({ "status": "Rejected" }));
}

#[tokio::test]
async fn generate_posts_the_request_with_its_template() {
    let backend = spawn(|request| (200, cv_from_request(&request.json(), "cv-1"))).await;
    let (client, _) = signed_in_client(&backend.url);
    let request = jobmate_core::domain::CvGenerationRequest::from_cv(&saved_cv(None));

    let cv = RestResumesAdapter::new(client).generate(&request).await.unwrap();

    assert_eq!(cv.id.as_deref(), Some("cv-1"));
    assert_eq!(cv.template, "modern");
    let recorded = backend.last();
    assert_eq!(recorded.path, "/resumes/generate");
    assert_eq!(recorded.json()["templateId"], "modern");
    assert_eq!(recorded.json()["personalInfo"]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn regenerate_targets_the_saved_resume_without_a_body() {
    let backend = spawn(|_| {
        let mut cv = serde_json::to_value(saved_cv(Some("cv-7"))).unwrap();
        cv["professionalSummary"] = json!("Sharper mathematician.");
        (200, cv)
    })
    .await;
    let (client, _) = signed_in_client(&backend.url);

    let cv = RestResumesAdapter::new(client)
        .regenerate(&saved_cv(Some("cv-7")))
        .await
        .unwrap();

    assert_eq!(cv.professional_summary, "Sharper mathematician.");
    let recorded = backend.last();
    assert_eq!(recorded.method, Method::POST);
    assert_eq!(recorded.path, "/resumes/cv-7/regenerate");
    assert!(recorded.body.is_empty());
}

#[tokio::test]
async fn regenerate_without_an_id_falls_back_to_generate() {
    let backend = spawn(|request| (200, cv_from_request(&request.json(), "cv-new"))).await;
    let (client, _) = signed_in_client(&backend.url);

    let cv = RestResumesAdapter::new(client)
        .regenerate(&saved_cv(None))
        .await
        .unwrap();

    assert_eq!(cv.id.as_deref(), Some("cv-new"));
    assert_eq!(backend.last().path, "/resumes/generate");
}

#[tokio::test]
async fn hr_queries_use_camel_case_parameters() {
    let backend = spawn(|request| match request.path.as_str() {
        "/hr/candidates" => (200, json!([])),
        _ => (
            200,
            json!({
                "metrics": {
                    "totalApplications": 12, "screeningCompletionRate": 75.0,
                    "shortlistRate": 25.0, "interviewRate": 16.7, "offerRate": 8.3,
                    "averageTimeToHire": 21.0, "averageScreeningTime": 3.2
                },
                "applicationsByStatus": [{ "status": "screening", "count": 4 }],
                "offerDistribution": [],
                "applicationsOverTime": [],
                "conversionFunnels": [],
                "aiCost": { "llmApiSpend": 1.5, "tokensUsed": 42000, "costPerApplication": 0.125 }
            }),
        ),
    })
    .await;
    let (client, _) = signed_in_client(&backend.url);
    let hr = RestHrAdapter::new(client);

    hr.candidates(Some("job-7")).await.unwrap();
    assert_eq!(backend.last().query.as_deref(), Some("jobId=job-7"));
    hr.candidates(None).await.unwrap();
    assert_eq!(backend.last().query, None);

    let data = hr
        .analytics(&AnalyticsFilters {
            start_date: Some("2025-01-01".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(data.metrics.total_applications, 12);
    assert_eq!(backend.last().path, "/hr/analytics");
    assert_eq!(backend.last().query.as_deref(), Some("startDate=2025-01-01"));
}

#[tokio::test]
async fn job_list_sends_status_filter() {
    let backend = spawn(|_| (200, json!([]))).await;
    let (client, _) = signed_in_client(&backend.url);

    RestJobsAdapter::new(client)
        .list_jobs(&JobQuery {
            status: Some(JobStatus::Active),
            search: None,
        })
        .await
        .unwrap();

    assert_eq!(backend.last().query.as_deref(), Some("status=active"));
}

#[tokio::test]
async fn login_posts_credentials() {
    let backend = spawn(|_| (200, json!({ "access_token": "fresh", "token_type": "bearer" }))).await;
    let session = SessionHandle::load(Arc::new(MemoryStore::new()));
    let client = ApiClient::new(&backend.url, Duration::from_secs(5), session).unwrap();

    let response = RestAuthAdapter::new(client)
        .login(&LoginCredentials {
            email: "ada@example.com".into(),
            password: "analytical".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.access_token, "fresh");
    assert!(response.user.is_none());
    let request = backend.last();
    assert_eq!(request.path, "/auth/login");
    assert_eq!(request.json()["email"], "ada@example.com");
}
