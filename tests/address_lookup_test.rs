use contact_registry::domain::AddressLookup;
use contact_registry::{ContactError, ViaCepClient};
use httpmock::prelude::*;
use std::time::Duration;

fn campo_grande() -> serde_json::Value {
    serde_json::json!({
        "cep": "79050-190",
        "logradouro": "Rua Euclides da Cunha",
        "complemento": "",
        "bairro": "Jardim dos Estados",
        "localidade": "Campo Grande",
        "uf": "MS",
        "ibge": "5002704",
        "ddd": "67"
    })
}

#[tokio::test]
async fn test_lookup_returns_parsed_address() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/79050190/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(campo_grande());
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), Some(Duration::from_secs(5))).unwrap();
    let address = client.lookup("79050190").await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(address.cep.as_deref(), Some("79050-190"));
    assert_eq!(address.localidade, "Campo Grande");
    assert_eq!(address.uf, "MS");
    assert_eq!(address.street_line(), "Rua Euclides da Cunha, Jardim dos Estados");
}

#[tokio::test]
async fn test_not_found_marker_is_invalid_postal_code() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"erro": "true"}));
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), None).unwrap();
    let err = client.lookup("99999999").await.unwrap_err();

    api_mock.assert_async().await;
    assert!(matches!(err, ContactError::InvalidPostalCodeError { ref message } if message == "invalid postal code"));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_empty_body_and_bad_request_are_invalid_postal_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/00000000/json/");
            then.status(200).body("");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/123/json/");
            then.status(400).body("<h1>Bad Request</h1>");
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), None).unwrap();

    let empty = client.lookup("00000000").await.unwrap_err();
    assert!(matches!(empty, ContactError::InvalidPostalCodeError { .. }));

    let malformed = client.lookup("123").await.unwrap_err();
    assert!(matches!(malformed, ContactError::InvalidPostalCodeError { .. }));
}

#[tokio::test]
async fn test_upstream_failure_is_lookup_error() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/79050190/json/");
            then.status(503);
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), None).unwrap();
    let err = client.lookup("79050190").await.unwrap_err();

    api_mock.assert_async().await;
    assert!(matches!(err, ContactError::LookupError(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_non_json_answer_is_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/79050190/json/");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), None).unwrap();
    let err = client.lookup("79050190").await.unwrap_err();

    assert!(matches!(err, ContactError::LookupResponseError { .. }));
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.kind(), "lookup_invalid_response");
}

#[tokio::test]
async fn test_blank_postal_code_never_calls_service() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200);
        })
        .await;

    let client = ViaCepClient::new(&server.base_url(), None).unwrap();
    let err = client.lookup("").await.unwrap_err();

    assert!(matches!(err, ContactError::InvalidPostalCodeError { ref message } if message == "postal code must be filled"));
    assert_eq!(api_mock.hits_async().await, 0);
}
