use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use usersroles_auth::fixtures::{Account, render_roles, render_users};
use usersroles_auth::{CredentialScheme, DigestAlgorithm, DigestConfig, Encoding, IdentityStoreSnapshot, Realm};

fn accounts(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| (format!("user{i}"), format!("password-{i}")))
        .collect()
}

fn build_snapshot(n: usize, scheme: CredentialScheme) -> IdentityStoreSnapshot {
    let owned = accounts(n);
    let list: Vec<Account<'_>> = owned
        .iter()
        .map(|(name, pwd)| Account::new(name, pwd, &["user"]))
        .collect();
    let realm = Realm::new("realm");
    let digest = (!scheme.plain).then_some(scheme.digest);

    IdentityStoreSnapshot::from_text(
        &render_users(&realm, &list, digest),
        &render_roles(&list),
        scheme,
        None,
    )
    .expect("generated files are well formed")
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_credential");

    for (label, scheme) in [
        ("plain", CredentialScheme::plain()),
        ("plain_ignore_case", CredentialScheme::plain().with_case_sensitive(false)),
        ("md5_hex", CredentialScheme::digest(DigestAlgorithm::Md5, Encoding::Hex)),
        ("sha256_base64", CredentialScheme::digest(DigestAlgorithm::Sha256, Encoding::Base64)),
    ] {
        let snapshot = build_snapshot(1_000, scheme);

        group.bench_with_input(BenchmarkId::new("known", label), &snapshot, |b, s| {
            b.iter(|| s.verify_credential(black_box("user500"), black_box("password-500")))
        });
        group.bench_with_input(BenchmarkId::new("unknown", label), &snapshot, |b, s| {
            b.iter(|| s.verify_credential(black_box("nobody"), black_box("password-500")))
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let owned = accounts(10_000);
    let list: Vec<Account<'_>> = owned
        .iter()
        .map(|(name, pwd)| Account::new(name, pwd, &["user", "reader"]))
        .collect();
    let users = render_users(&Realm::new("realm"), &list, Some(DigestConfig::default()));
    let roles = render_roles(&list);
    let scheme = CredentialScheme::digest(DigestAlgorithm::Md5, Encoding::Hex);

    c.bench_function("snapshot_from_text_10k", |b| {
        b.iter(|| IdentityStoreSnapshot::from_text(black_box(&users), black_box(&roles), scheme, None))
    });
}

criterion_group!(benches, bench_verify, bench_parse);
criterion_main!(benches);
