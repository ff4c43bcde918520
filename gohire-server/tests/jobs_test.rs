//! Job and internship browsing

mod common;

use axum::http::StatusCode;
use gohire_server::store::{JobStore, NewInternship, NewJob};
use serde_json::Value;

use common::create_test_server;

fn seed_jobs(ctx: &common::TestContext) {
    let postings = [
        ("Backend Engineer", "Ferrous Labs", "Remote", "full-time"),
        ("Frontend Engineer", "PixelWorks", "Pune", "full-time"),
        ("Data Engineer", "Ferrous Labs", "Remote", "contract"),
        ("QA Analyst", "PixelWorks", "Remote", "part-time"),
    ];
    for (title, company, location, job_type) in postings {
        ctx.store
            .create_job(NewJob {
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
                job_type: job_type.to_string(),
                salary: Some(90_000),
                description: "Build things".to_string(),
            })
            .unwrap();
    }
}

#[tokio::test]
async fn listings_are_public_and_filterable() {
    let ctx = create_test_server();
    seed_jobs(&ctx);

    // No session required
    let response = ctx.server.get("/api/jobs").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 4);

    let response = ctx.server.get("/api/jobs?q=engineer&location=Remote").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);

    let response = ctx.server.get("/api/jobs?job_type=part-time").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["jobs"][0]["title"], "QA Analyst");
}

#[tokio::test]
async fn listing_pages_are_clamped() {
    let ctx = create_test_server();
    seed_jobs(&ctx);

    let response = ctx.server.get("/api/jobs?page=0&per_page=3").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["perPage"], 3);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 3);
    assert_eq!(body["totalPages"], 2);

    let response = ctx.server.get("/api/jobs?page=2&per_page=3").await;
    let body: Value = response.json();
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn job_detail_and_missing_job() {
    let ctx = create_test_server();
    seed_jobs(&ctx);

    let listing: Value = ctx.server.get("/api/jobs?per_page=1").await.json();
    let id = listing["jobs"][0]["id"].as_u64().unwrap();

    let response = ctx.server.get(&format!("/api/jobs/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["job"]["id"], id);

    let response = ctx.server.get("/api/jobs/999999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "not_found");
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn internships_filter_by_duration() {
    let ctx = create_test_server();
    for (title, months) in [("Summer Intern", 3), ("Co-op", 6), ("Research Intern", 12)] {
        ctx.store
            .create_internship(NewInternship {
                title: title.to_string(),
                company: "Ferrous Labs".to_string(),
                location: "Remote".to_string(),
                duration_months: months,
                stipend: Some(2_000),
                description: "Learn things".to_string(),
            })
            .unwrap();
    }

    let response = ctx.server.get("/api/internships?max_duration=6").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);

    let response = ctx.server.get("/api/internships?q=research").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["internships"][0]["durationMonths"], 12);
}
