mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use snbp::store::Store;
use snbp::types::{Program, Role};

#[tokio::test]
async fn home_content_defaults() {
    let app = TestApp::new();

    let (status, body) = app.get("/home/content", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "PUBLIC");
    assert_eq!(body["data"]["title"], "Simulasi & Pendaftaran SNBP Sekolah");

    let (_, body) = app.get("/home/content?role=guru_bk", None).await;
    assert_eq!(body["data"]["role"], "GURU_BK");
    assert_eq!(body["data"]["title"], "Beranda Guru BK");

    let (_, body) = app.get("/home/content?role=KEPALA", None).await;
    assert_eq!(body["data"]["role"], "PUBLIC");
}

#[tokio::test]
async fn admin_updates_home_content() {
    let app = TestApp::new();
    let admin = app.staff("admin@sekolah.sch.id", Role::Admin).await;
    let student = app.student("siswa@sekolah.sch.id").await;

    let (status, _) = app
        .post(
            "/home/content",
            Some(&student),
            json!({"role": "SISWA", "title": "Halo"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            "/home/content",
            Some(&admin),
            json!({"role": "GURU", "title": "Halo"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("KEPALA_SEKOLAH"));

    let (status, _) = app
        .post("/home/content", Some(&admin), json!({"role": "SISWA"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/home/content",
            Some(&admin),
            json!({"role": "siswa", "title": "Selamat datang", "subtitle": "Semangat!"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"role": "SISWA", "title": "Selamat datang", "subtitle": "Semangat!"})
    );

    let (_, body) = app.get("/home/content?role=SISWA", None).await;
    assert_eq!(body["data"]["title"], "Selamat datang");

    // Upsert replaces; a missing subtitle becomes empty.
    app.post(
        "/home/content",
        Some(&admin),
        json!({"role": "SISWA", "title": "Baru"}),
    )
    .await;
    let (_, body) = app.get("/home/content?role=siswa", None).await;
    assert_eq!(
        body["data"],
        json!({"role": "SISWA", "title": "Baru", "subtitle": ""})
    );

    // Other roles keep their defaults.
    let (_, body) = app.get("/home/content?role=ADMIN", None).await;
    assert_eq!(body["data"]["title"], "Beranda Admin SNBP Sekolah");
}

#[tokio::test]
async fn universities_and_programs() {
    let app = TestApp::new();
    for (university, name) in [
        ("Universitas Indonesia", "Kedokteran"),
        ("Universitas Indonesia", "Hukum"),
        ("Institut Teknologi Bandung", "Informatika"),
    ] {
        app.store
            .upsert_program(&Program {
                name: name.to_string(),
                university_name: university.to_string(),
            })
            .unwrap();
    }

    let (status, body) = app.get("/universitas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!(["Institut Teknologi Bandung", "Universitas Indonesia"])
    );

    let (_, body) = app
        .get("/universitas/prodi?universitas=Universitas%20Indonesia", None)
        .await;
    assert_eq!(
        body["data"],
        json!([
            {"prodi": "Hukum", "universitas": "Universitas Indonesia"},
            {"prodi": "Kedokteran", "universitas": "Universitas Indonesia"},
        ])
    );

    let (_, body) = app.get("/universitas/prodi", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}
