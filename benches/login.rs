//! 登录路径基准：Argon2 校验与会话令牌签发
//!
//! 未知邮箱会对 dummy hash 做一次校验，两条路径耗时应该接近。

use criterion::{Criterion, criterion_group, criterion_main};
use geotracker::api::jwt::JwtService;
use geotracker::utils::password::{dummy_hash, hash_password, verify_password};

fn bench_login_verify(c: &mut Criterion) {
    let stored = hash_password("password123").expect("hash should succeed");
    let dummy = dummy_hash().expect("dummy hash available");

    let mut group = c.benchmark_group("login/verify");
    group.sample_size(20);

    group.bench_function("known_email", |b| {
        b.iter(|| verify_password("password123", &stored).expect("verify"));
    });

    group.bench_function("unknown_email", |b| {
        b.iter(|| verify_password("password123", dummy).expect("verify"));
    });

    group.finish();
}

fn bench_session_token(c: &mut Criterion) {
    let jwt = JwtService::new("bench-secret", 24);
    let token = jwt
        .generate_token(42, "bench@example.com")
        .expect("sign");

    c.bench_function("token/issue", |b| {
        b.iter(|| jwt.generate_token(42, "bench@example.com").expect("sign"));
    });

    c.bench_function("token/validate", |b| {
        b.iter(|| jwt.validate_token(&token).expect("valid"));
    });
}

criterion_group!(benches, bench_login_verify, bench_session_token);
criterion_main!(benches);
