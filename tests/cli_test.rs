use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn checkout_cmd(backend_url: &str, amount: &str, card: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("card-checkout"));
    cmd.env_remove("CHECKOUT_BACKEND_URL")
        .arg("--backend-url")
        .arg(backend_url)
        .arg("--amount")
        .arg(amount)
        .arg("--card")
        .arg(card)
        .arg("--exp")
        .arg("12/34")
        .arg("--cvc")
        .arg("123");
    cmd
}

fn backend() -> (mockito::ServerGuard, Vec<mockito::Mock>) {
    let mut server = mockito::Server::new();
    let config = server
        .mock("GET", "/config")
        .with_status(200)
        .with_body(r#"{"publishableKey": "pk_test_1"}"#)
        .create();
    let intent = server
        .mock("POST", "/create-payment-intent")
        .with_status(200)
        .with_body(r#"{"clientSecret": "pi_test_1_secret_abc"}"#)
        .create();
    (server, vec![config, intent])
}

#[test]
fn test_cli_successful_payment() {
    let (server, _mocks) = backend();

    checkout_cmd(&server.url(), "10.00", "4242424242424242")
        .assert()
        .success()
        .stdout(predicate::str::contains("== Payment succeeded =="))
        .stdout(predicate::str::contains("\"id\": \"pi_test_1\""));
}

#[test]
fn test_cli_declined_payment() {
    let (server, _mocks) = backend();

    checkout_cmd(&server.url(), "10.00", "4000000000000002")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "== Payment failed ==\nYour card was declined.\n[ Ok ]",
        ));
}

#[test]
fn test_cli_fetches_config_once_across_screens() {
    let mut server = mockito::Server::new();
    let config = server
        .mock("GET", "/config")
        .with_status(200)
        .with_body(r#"{"publishableKey": "pk_test_1"}"#)
        .expect(1)
        .create();
    let intent = server
        .mock("POST", "/create-payment-intent")
        .with_status(200)
        .with_body(r#"{"clientSecret": "pi_test_1_secret_abc"}"#)
        .expect(1)
        .create();

    checkout_cmd(&server.url(), "10.00", "4242424242424242")
        .assert()
        .success();

    config.assert();
    intent.assert();
}

#[test]
fn test_cli_empty_amount() {
    let mut server = mockito::Server::new();
    // The amount screen still loads the configuration.
    let config = server
        .mock("GET", "/config")
        .with_status(200)
        .with_body(r#"{"publishableKey": "pk_test_1"}"#)
        .expect(1)
        .create();
    let intent = server
        .mock("POST", "/create-payment-intent")
        .expect(0)
        .create();

    checkout_cmd(&server.url(), "", "4242424242424242")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "== Invalid amount ==\nInsert payment amount",
        ))
        .stdout(predicate::str::contains("Request failed").not());

    config.assert();
    intent.assert();
}

#[test]
fn test_cli_backend_rejects_intent() {
    let mut server = mockito::Server::new();
    let _config = server
        .mock("GET", "/config")
        .with_status(200)
        .with_body(r#"{"publishableKey": "pk_test_1"}"#)
        .create();
    let intent = server
        .mock("POST", "/create-payment-intent")
        .with_status(500)
        .expect(1)
        .create();

    checkout_cmd(&server.url(), "10.00", "4242424242424242")
        .assert()
        .failure()
        .stdout(predicate::str::contains("== Failed to load PaymentIntent =="))
        .stdout(predicate::str::contains("== Payment not ready =="));

    intent.assert();
}

#[test]
fn test_cli_unsupported_backend_scheme() {
    checkout_cmd("ftp://127.0.0.1/", "10.00", "4242424242424242")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "== Request failed ==\nError: Transport error: unsupported URL scheme `ftp`",
        ));
}

#[test]
fn test_cli_unreachable_backend() {
    checkout_cmd("http://127.0.0.1:1/", "10.00", "4242424242424242")
        .assert()
        .failure()
        .stdout(predicate::str::contains("== Request failed =="))
        .stdout(predicate::str::contains("Transport error"));
}
