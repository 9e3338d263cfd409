#![allow(clippy::unwrap_used)]
// Integration tests for `CatalogClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grimdarkly_api::{CatalogClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CatalogClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = CatalogClient::new(&base, &TransportConfig::default()).unwrap();
    (server, client)
}

fn unit_json(id: u32, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "movement": 6,
        "toughness": 5,
        "save": 3,
        "wounds": 3,
        "leadership": 6,
        "oc": 2,
        "unitType": "OTHER",
        "faction": { "id": 4, "name": "World Eaters", "category": { "id": 1, "name": "Chaos" } },
        "weapons": [{ "id": 1, "name": "Bolt pistol" }],
        "unitAbilities": [],
        "keywords": ["Infantry", "Berzerker"],
        "configurations": [{ "id": 1, "unitId": id, "modelCount": 10, "description": "10 models", "points": 180 }],
        "options": [],
        "compositions": []
    })
}

// ── Faction tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_factions() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/factions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "name": "Orks", "category": { "id": 2, "name": "Xenos" } },
                { "id": 2, "name": "Necrons", "category": { "id": 2, "name": "Xenos" } }
            ],
            "count": 2
        })))
        .mount(&server)
        .await;

    let factions = client.list_factions().await.unwrap();
    assert_eq!(factions.len(), 2);
    assert_eq!(factions[0].name, "Orks");
    assert_eq!(factions[1].category.name, "Xenos");
}

#[tokio::test]
async fn test_get_faction_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/factions/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Faction not found"
        })))
        .mount(&server)
        .await;

    let result = client.get_faction(99).await;
    let err = result.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

// ── Unit tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_units_sends_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .and(query_param("faction", "World Eaters"))
        .and(query_param("keyword", "berzerker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [unit_json(12, "Khorne Berzerkers")],
            "meta": {
                "searchParams": { "faction": "World Eaters", "keyword": "berzerker" },
                "nameTerms": [],
                "count": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = vec![
        ("faction", "World Eaters".to_owned()),
        ("keyword", "berzerker".to_owned()),
    ];
    let resp = client.search_units(&params).await.unwrap();
    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.data[0].name, "Khorne Berzerkers");
    assert_eq!(resp.data[0].keywords[1].name(), "Berzerker");
    assert_eq!(resp.meta.unwrap().count, 1);
}

#[tokio::test]
async fn test_search_units_empty_is_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "meta": { "searchParams": {}, "nameTerms": [], "count": 0 }
        })))
        .mount(&server)
        .await;

    let resp = client
        .search_units(&[("name", "nothing".to_owned())])
        .await
        .unwrap();
    assert!(resp.data.is_empty());
}

#[tokio::test]
async fn test_unit_by_name_is_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/name/Khorne%20Berzerkers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": unit_json(12, "Khorne Berzerkers")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let unit = client.get_unit_by_name("Khorne Berzerkers").await.unwrap();
    assert_eq!(unit.id, 12);
    assert_eq!(unit.configurations[0].points, 180);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/weapons/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "database unavailable"
        })))
        .mount(&server)
        .await;

    let err = client
        .search_weapons(&[("name", "bolt".to_owned())])
        .await
        .unwrap_err();
    match err {
        Error::Api { status, ref message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/weapons/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Invalid weapon id"
        })))
        .mount(&server)
        .await;

    let err = client.get_weapon(3).await.unwrap_err();
    assert!(
        matches!(err, Error::Rejected { ref message } if message == "Invalid weapon id"),
        "expected Rejected, got: {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/weapons/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_weapon(5).await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("oops")),
        "expected Deserialization, got: {err:?}"
    );
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    let client =
        CatalogClient::new(&format!("{}/api/", server.uri()), &TransportConfig::default())
            .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/weapons/search"))
        .and(query_param("ap", "-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": 1, "name": "Plasma gun", "weaponType": "RANGED", "range": 24,
                "attacks": "1", "skill": 3, "strength": "7", "ap": -2, "damage": "1",
                "abilities": [{ "value": null, "ability": { "id": 2, "name": "Hazardous" } }],
                "units": [{ "id": 9, "name": "Intercessors", "faction": "Space Marines" }]
            }]
        })))
        .mount(&server)
        .await;

    let resp = client
        .search_weapons(&[("ap", "-2".to_owned())])
        .await
        .unwrap();
    assert_eq!(resp.data[0].ap, -2);
    assert_eq!(resp.data[0].abilities[0].ability.name, "Hazardous");
    assert!(resp.meta.is_none());
}
