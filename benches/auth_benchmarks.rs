use criterion::{criterion_group, criterion_main, Criterion};
use sessiongate::auth::{
    requires_auth, AuthStrategy, BasicSessionAuth, ExpiringSessionAuth, SessionDuration,
    SessionStore,
};
use std::hint::black_box;

fn bench_requires_auth(c: &mut Criterion) {
    let exclusions: Vec<String> = vec![
        "/api/v1/status/".to_string(),
        "/api/v1/unauthorized/".to_string(),
        "/api/v1/forbidden/".to_string(),
        "/api/v1/auth_session/login/".to_string(),
        "/public/*".to_string(),
    ];

    c.bench_function("requires_auth_exempt", |b| {
        b.iter(|| requires_auth(black_box(Some("/public/css/site.css")), &exclusions))
    });

    c.bench_function("requires_auth_guarded", |b| {
        b.iter(|| requires_auth(black_box(Some("/api/v1/users/me")), &exclusions))
    });
}

fn bench_session_lookup(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let auth = ExpiringSessionAuth::new(
        BasicSessionAuth::new(SessionStore::new(), "sid"),
        SessionDuration::from_secs(3600),
    );
    let session_id = runtime.block_on(async {
        for i in 0..1000 {
            auth.create_session(Some(&i.to_string())).await;
        }
        auth.create_session(Some("42")).await.unwrap()
    });

    c.bench_function("expiring_lookup", |b| {
        b.iter(|| {
            runtime.block_on(auth.user_id_for_session_id(black_box(Some(session_id.as_str()))))
        })
    });

    c.bench_function("expiring_create", |b| {
        b.iter(|| runtime.block_on(auth.create_session(black_box(Some("7")))))
    });
}

criterion_group!(benches, bench_requires_auth, bench_session_lookup);
criterion_main!(benches);
