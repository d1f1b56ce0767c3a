mod common;

use axum::http::{Method, StatusCode, header};
use chrono::{Datelike, Utc};
use serde_json::{Value, json};

use common::{PUBLIC_URL, TestApp};
use snbp::types::{RegistrationStatus, Role};

struct Staff {
    bk: String,
    kepsek: String,
    admin: String,
}

async fn staff(app: &TestApp) -> Staff {
    Staff {
        bk: app.staff("bk@sekolah.sch.id", Role::GuruBk).await,
        kepsek: app.staff("kepsek@sekolah.sch.id", Role::KepalaSekolah).await,
        admin: app.staff("admin@sekolah.sch.id", Role::Admin).await,
    }
}

fn expected_number(id: i64) -> String {
    format!("SNBP-{}-{id:04}", Utc::now().year())
}

#[tokio::test]
async fn registration_starts_pending_and_is_unique() {
    let app = TestApp::new();
    let token = app.student("ani@sekolah.sch.id").await;
    app.save_profile(&token, "Ani", "2007-05-17").await;

    let reg = app
        .register_programs(&token, "Kedokteran - Universitas Indonesia", Some("Farmasi - UGM"))
        .await;
    let id = reg["id"].as_i64().unwrap();
    assert_eq!(reg["nomorPendaftaran"], expected_number(id));
    assert_eq!(reg["status"], "MENUNGGU");
    assert_eq!(reg["dikirimKeKepsek"], false);
    assert!(reg["kepsekStatus"].is_null());
    assert_eq!(reg["email"], "ani@sekolah.sch.id");
    assert_eq!(reg["sekolah"], "SMA Negeri 1 Bandung");

    let (status, body) = app
        .post("/pendaftaran", Some(&token), json!({"prodi1": "Hukum"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already have"));

    let (_, body) = app.get("/pendaftaran", Some(&token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["prodi2"], "Farmasi - UGM");
}

#[tokio::test]
async fn registration_requires_first_choice() {
    let app = TestApp::new();
    let token = app.student("bayu@sekolah.sch.id").await;

    let (status, body) = app
        .post("/pendaftaran", Some(&token), json!({"prodi2": "Hukum"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "prodi1 is required");

    let (_, body) = app.get("/pendaftaran", Some(&token)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn eligibility_state_machine() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("cici@sekolah.sch.id").await;
    app.save_profile(&token, "Cici", "2007-02-02").await;
    let user_id = app.user_id("cici@sekolah.sch.id");

    // Principal cannot act before the counselor.
    let (status, body) = app
        .post(
            &format!("/kepsek/siswa/{user_id}/eligibility"),
            Some(&s.kepsek),
            json!({"status": "ELIGIBLE"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("MENUNGGU_KEPSEK"));

    // Counselor cannot jump straight to ELIGIBLE.
    let (status, _) = app
        .post(
            &format!("/bk/siswa/{user_id}/eligibility"),
            Some(&s.bk),
            json!({"status": "ELIGIBLE"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &format!("/bk/siswa/{user_id}/eligibility"),
            Some(&s.bk),
            json!({"status": "SIAP"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            &format!("/bk/siswa/{user_id}/eligibility"),
            Some(&s.bk),
            json!({"status": "MENUNGGU_KEPSEK"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"userId": user_id, "eligibilityStatus": "MENUNGGU_KEPSEK"})
    );

    // Counselor already acted.
    let (status, _) = app
        .post(
            &format!("/bk/siswa/{user_id}/eligibility"),
            Some(&s.bk),
            json!({"status": "TIDAK_ELIGIBLE"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &format!("/kepsek/siswa/{user_id}/eligibility"),
            Some(&s.kepsek),
            json!({"status": "TIDAK_ELIGIBLE"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/profil/eligibility-status", Some(&token)).await;
    assert_eq!(body["data"]["eligibilityStatus"], "TIDAK_ELIGIBLE");

    let (status, _) = app
        .post(
            "/bk/siswa/99999/eligibility",
            Some(&s.bk),
            json!({"status": "MENUNGGU_KEPSEK"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_rows_use_semester_averages() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("dodi@sekolah.sch.id").await;
    app.save_profile(&token, "Dodi", "2007-04-04").await;
    app.add_grade(&token, 1, "Matematika", 80.0).await;
    app.add_grade(&token, 1, "Fisika", 90.0).await;
    app.add_grade(&token, 2, "Matematika", 100.0).await;

    let (status, body) = app.get("/bk/siswa", Some(&s.bk)).await;
    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["nama"], "Dodi");
    assert_eq!(row["email"], "dodi@sekolah.sch.id");
    assert_eq!(row["eligibilityStatus"], "MENUNGGU_BK");
    // (85 + 100 + 0 + 0 + 0) / 5
    assert_eq!(row["rataRata"], 37.0);
    assert_eq!(row["missingSemesters"], json!([3, 4, 5]));

    let (_, kepsek_rows) = app.get("/kepsek/siswa", Some(&s.kepsek)).await;
    assert_eq!(kepsek_rows, body);
}

#[tokio::test]
async fn eligible_student_registration_skips_principal_review() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("euis@sekolah.sch.id").await;
    app.save_profile(&token, "Euis", "2007-06-06").await;
    let user_id = app.user_id("euis@sekolah.sch.id");

    app.post(
        &format!("/bk/siswa/{user_id}/eligibility"),
        Some(&s.bk),
        json!({"status": "MENUNGGU_KEPSEK"}),
    )
    .await;
    let (status, _) = app
        .post(
            &format!("/kepsek/siswa/{user_id}/eligibility"),
            Some(&s.kepsek),
            json!({"status": "ELIGIBLE"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let reg = app.register_programs(&token, "Hukum - UNPAD", None).await;
    assert_eq!(reg["dikirimKeKepsek"], true);
    assert_eq!(reg["kepsekStatus"], "DISETUJUI");
}

#[tokio::test]
async fn principal_approval_of_eligibility_approves_existing_registrations() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("fina@sekolah.sch.id").await;
    app.save_profile(&token, "Fina", "2007-07-07").await;
    let reg = app.register_programs(&token, "Akuntansi - UNAIR", None).await;
    let user_id = app.user_id("fina@sekolah.sch.id");

    let (_, body) = app.get("/admin/seleksi", Some(&s.admin)).await;
    assert_eq!(body["data"], json!([]));

    app.post(
        &format!("/bk/siswa/{user_id}/eligibility"),
        Some(&s.bk),
        json!({"status": "MENUNGGU_KEPSEK"}),
    )
    .await;
    app.post(
        &format!("/kepsek/siswa/{user_id}/eligibility"),
        Some(&s.kepsek),
        json!({"status": "ELIGIBLE"}),
    )
    .await;

    let (_, body) = app.get("/admin/seleksi", Some(&s.admin)).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], reg["id"]);
    assert_eq!(rows[0]["kepsekStatus"], "DISETUJUI");
    assert_eq!(rows[0]["dikirimKeKepsek"], true);
}

#[tokio::test]
async fn counselor_review_and_principal_decision() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("gani@sekolah.sch.id").await;
    app.save_profile(&token, "Gani", "2007-08-08").await;
    app.add_grade(&token, 1, "Matematika", 70.0).await;
    app.add_grade(&token, 1, "Fisika", 80.0).await;
    let reg = app.register_programs(&token, "Teknik Sipil - ITB", None).await;
    let id = reg["id"].as_i64().unwrap();

    let (_, body) = app.get("/bk/pendaftaran", Some(&s.bk)).await;
    assert_eq!(body["data"][0]["rataRata"], 75.0);

    // Only accepted registrations can be forwarded.
    let resp = app
        .send(
            Method::POST,
            &format!("/bk/pendaftaran/{id}/kirim-ke-kepsek"),
            Some(&s.bk),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .patch(
            &format!("/bk/pendaftaran/{id}/status"),
            Some(&s.bk),
            json!({"status": "DITERIMA"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DITERIMA");

    let resp = app
        .send(
            Method::POST,
            &format!("/bk/pendaftaran/{id}/kirim-ke-kepsek"),
            Some(&s.bk),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["data"]["dikirimKeKepsek"], true);
    assert_eq!(body["data"]["kepsekStatus"], "BELUM_DITINJAU");

    // Rejection needs a reason.
    let (status, _) = app
        .patch(
            &format!("/kepsek/pendaftaran/{id}"),
            Some(&s.kepsek),
            json!({"kepsekStatus": "DITOLAK"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .patch(
            &format!("/kepsek/pendaftaran/{id}"),
            Some(&s.kepsek),
            json!({"kepsekStatus": "DITOLAK", "kepsekAlasan": "Nilai belum memenuhi"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kepsekStatus"], "DITOLAK");
    assert_eq!(body["data"]["kepsekAlasan"], "Nilai belum memenuhi");

    let (_, body) = app.get("/kepsek/pendaftaran", Some(&s.kepsek)).await;
    assert_eq!(body["data"][0]["kepsekStatus"], "DITOLAK");

    // Admin cannot finalize without principal approval.
    let (status, _) = app
        .post(
            &format!("/admin/seleksi/{id}"),
            Some(&s.admin),
            json!({"status": "DITERIMA"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn counselor_can_delete_registrations() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("hana@sekolah.sch.id").await;
    let reg = app.register_programs(&token, "Psikologi - UI", None).await;
    let id = reg["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/bk/pendaftaran/{id}"), Some(&s.bk)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, _) = app.delete(&format!("/bk/pendaftaran/{id}"), Some(&s.bk)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The student may register again.
    app.register_programs(&token, "Psikologi - UNPAD", None).await;
}

async fn approved_registration(app: &TestApp, s: &Staff, email: &str, nama: &str) -> Value {
    let token = app.student(email).await;
    app.save_profile(&token, nama, "2007-05-17").await;
    app.add_grade(&token, 1, "Matematika", 90.0).await;
    app.add_grade(&token, 2, "Fisika", 80.0).await;
    let reg = app
        .register_programs(
            &token,
            "Kedokteran - Universitas Indonesia",
            Some("Farmasi - Universitas Airlangga"),
        )
        .await;
    let id = reg["id"].as_i64().unwrap();

    app.patch(
        &format!("/bk/pendaftaran/{id}/status"),
        Some(&s.bk),
        json!({"status": "DITERIMA"}),
    )
    .await;
    app.send(
        Method::POST,
        &format!("/bk/pendaftaran/{id}/kirim-ke-kepsek"),
        Some(&s.bk),
        None,
    )
    .await;
    let (status, body) = app
        .patch(
            &format!("/kepsek/pendaftaran/{id}"),
            Some(&s.kepsek),
            json!({"kepsekStatus": "DISETUJUI"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn admin_selection_scores() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let reg = approved_registration(&app, &s, "ika@sekolah.sch.id", "Ika").await;

    let (status, body) = app.get("/admin/seleksi", Some(&s.admin)).await;
    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["id"], reg["id"]);
    assert_eq!(row["rataRata"], 85.0);
    // Kedokteran is a difficult program.
    assert_eq!(row["persentase1"], 75.0);
    assert_eq!(row["persentase2"], 85.0);
}

#[tokio::test]
async fn admin_accepts_second_choice_and_notifies() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let reg = approved_registration(&app, &s, "joko@sekolah.sch.id", "Joko").await;
    let id = reg["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            &format!("/admin/seleksi/{id}"),
            Some(&s.admin),
            json!({"status": "MENUNGGU"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            &format!("/admin/seleksi/{id}"),
            Some(&s.admin),
            json!({"status": "DITERIMA", "pilihanDiterima": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DITERIMA");
    assert_eq!(body["data"]["prodi1"], "Farmasi - Universitas Airlangga");
    assert!(body["data"].get("prodi2").is_none());
    assert_eq!(body["data"]["prodiDiterima"], "Farmasi - Universitas Airlangga");

    let sent = app.notifier.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "joko@sekolah.sch.id");
    assert_eq!(email.status, RegistrationStatus::Diterima);
    assert_eq!(email.program, "Farmasi - Universitas Airlangga");
    assert_eq!(email.registration_number, expected_number(id));
    assert_eq!(
        email.lookup_link().as_deref(),
        Some(format!("{PUBLIC_URL}/cek-pengumuman-standalone").as_str())
    );
}

#[tokio::test]
async fn public_lookup() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let reg = approved_registration(&app, &s, "kiki@sekolah.sch.id", "Kiki").await;
    let id = reg["id"].as_i64().unwrap();
    let nomor = expected_number(id);

    let (status, body) = app
        .get(
            &format!("/pendaftaran/cek?nomor={nomor}&tglLahir=2007-05-17"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nomorPendaftaran"], nomor);
    assert_eq!(body["data"]["hasil"], "pending");

    app.post(
        &format!("/admin/seleksi/{id}"),
        Some(&s.admin),
        json!({"status": "DITOLAK"}),
    )
    .await;
    let (_, body) = app
        .get(
            &format!("/pendaftaran/cek?nomor={nomor}&tglLahir=2007-05-17T00:00:00Z"),
            None,
        )
        .await;
    assert_eq!(body["data"]["hasil"], "tidak lulus");
    assert!(body["data"]["prodiDiterima"].is_null());

    // Wrong birth date and unknown numbers look the same.
    let (status, wrong_date) = app
        .get(
            &format!("/pendaftaran/cek?nomor={nomor}&tglLahir=2007-05-18"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, unknown) = app
        .get("/pendaftaran/cek?nomor=SNBP-2020-9999&tglLahir=2007-05-17", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(wrong_date, unknown);

    // Right id under the wrong year does not match either.
    let (status, _) = app
        .get(
            &format!("/pendaftaran/cek?nomor=SNBP-1999-{id:04}&tglLahir=2007-05-17"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get("/pendaftaran/cek?nomor=SNBP-2025-abc&tglLahir=2007-05-17", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .get(&format!("/pendaftaran/cek?nomor={nomor}"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn results_csv_download() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let first = approved_registration(&app, &s, "lia@sekolah.sch.id", "Lia \"Lili\"").await;
    let second = approved_registration(&app, &s, "mira@sekolah.sch.id", "Mira").await;
    let third = approved_registration(&app, &s, "nina@sekolah.sch.id", "Nina").await;

    for (reg, status) in [(&first, "DITERIMA"), (&second, "DITOLAK")] {
        let (code, _) = app
            .post(
                &format!("/admin/seleksi/{}", reg["id"]),
                Some(&s.admin),
                json!({"status": status}),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
    }
    app.notifier.wait_for(2).await;

    let resp = app
        .send(Method::GET, "/admin/seleksi/download", Some(&s.admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"hasil-seleksi-snbp.csv\""
    );

    let lines: Vec<&str> = resp.text.lines().collect();
    assert_eq!(
        lines,
        [
            "\"Nomor Pendaftaran\",\"Nama\",\"Email\",\"Sekolah\",\"Prodi Diterima\",\"Status Admin\"".to_string(),
            format!(
                "\"{}\",\"Lia \"\"Lili\"\"\",\"lia@sekolah.sch.id\",\"SMA Negeri 1 Bandung\",\"Kedokteran - Universitas Indonesia\",\"DITERIMA\"",
                first["nomorPendaftaran"].as_str().unwrap()
            ),
            format!(
                "\"{}\",\"Mira\",\"mira@sekolah.sch.id\",\"SMA Negeri 1 Bandung\",\"\",\"DITOLAK\"",
                second["nomorPendaftaran"].as_str().unwrap()
            ),
            // Accepted by the counselor only: the first choice is exported.
            format!(
                "\"{}\",\"Nina\",\"nina@sekolah.sch.id\",\"SMA Negeri 1 Bandung\",\"Kedokteran - Universitas Indonesia\",\"DITERIMA\"",
                third["nomorPendaftaran"].as_str().unwrap()
            ),
        ]
    );
}

#[tokio::test]
async fn counselor_rejection_after_admission_drops_admitted_program() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let reg = approved_registration(&app, &s, "putri@sekolah.sch.id", "Putri").await;
    let id = reg["id"].as_i64().unwrap();
    let nomor = reg["nomorPendaftaran"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            &format!("/admin/seleksi/{id}"),
            Some(&s.admin),
            json!({"status": "DITERIMA"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["prodiDiterima"], "Kedokteran - Universitas Indonesia");
    app.notifier.wait_for(1).await;

    let (status, body) = app
        .patch(
            &format!("/bk/pendaftaran/{id}/status"),
            Some(&s.bk),
            json!({"status": "DITOLAK"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DITOLAK");
    assert!(body["data"]["prodiDiterima"].is_null());

    let (_, body) = app
        .get(
            &format!("/pendaftaran/cek?nomor={nomor}&tglLahir=2007-05-17"),
            None,
        )
        .await;
    assert_eq!(body["data"]["hasil"], "tidak lulus");
    assert!(body["data"]["prodiDiterima"].is_null());

    let resp = app
        .send(Method::GET, "/admin/seleksi/download", Some(&s.admin), None)
        .await;
    let lines: Vec<&str> = resp.text.lines().collect();
    assert_eq!(
        lines[1],
        format!(
            "\"{nomor}\",\"Putri\",\"putri@sekolah.sch.id\",\"SMA Negeri 1 Bandung\",\"\",\"DITOLAK\""
        )
    );
}

#[tokio::test]
async fn results_csv_skips_waiting_registrations() {
    let app = TestApp::new();
    let s = staff(&app).await;
    let token = app.student("oki@sekolah.sch.id").await;
    app.register_programs(&token, "Hukum - UI", None).await;

    let resp = app
        .send(Method::GET, "/admin/seleksi/download", Some(&s.admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text.lines().count(), 1);
}
