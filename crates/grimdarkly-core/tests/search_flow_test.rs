#![allow(clippy::unwrap_used)]
// End-to-end search flows against a wiremock catalog.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grimdarkly_core::{
    Catalog, CatalogConfig, CoreError, DetailState, FilterField, PageSort, RecordKind,
    SearchPage, SearchPhase, SearchResults, SortDirection, SortState, UnitSortKey,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Catalog) {
    let server = MockServer::start().await;
    let config = CatalogConfig::new(&format!("{}/api", server.uri()), 5).unwrap();
    let catalog = Catalog::new(&config).unwrap();
    (server, catalog)
}

fn unit_json(id: u32, name: &str, toughness: i32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "movement": 6,
        "toughness": toughness,
        "save": 3,
        "wounds": 2,
        "leadership": 6,
        "oc": 2,
        "unitType": "BATTLELINE",
        "faction": { "id": 4, "name": "World Eaters", "category": { "id": 1, "name": "Chaos" } },
        "weapons": [
            { "id": 1, "name": "Bolt pistol" },
            { "id": 2, "name": "Chainblade" },
            { "id": 3, "name": "Plasma pistol" },
            { "id": 4, "name": "Power fist" }
        ],
        "keywords": ["Infantry", "Berzerker", "Chaos"]
    })
}

fn search_ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": data,
        "meta": { "searchParams": {}, "nameTerms": [], "count": 0 }
    }))
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn keyword_and_faction_search_populates_results() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .and(query_param("keyword", "berzerker"))
        .and(query_param("faction", "World Eaters"))
        .respond_with(search_ok(json!([
            unit_json(2, "Khorne Berzerkers", 4),
            unit_json(1, "Eightbound", 6)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = SearchPage::new(RecordKind::Unit);
    page.form_mut().keywords_mut().on_text_change("berzerker");
    page.form_mut().keywords_mut().on_commit().unwrap();
    page.form_mut()
        .set_field(FilterField::Faction, Some("World Eaters"))
        .unwrap();

    assert!(page.search(&catalog).await.unwrap());
    assert_eq!(page.status_line(), "Found 2 units");

    let Some(SearchResults::Units(sorted)) = page.sorted_results() else {
        panic!("expected unit results");
    };
    assert_eq!(sorted[0].name, "Eightbound");

    page.set_sort(PageSort::Unit(SortState::new(
        UnitSortKey::Toughness,
        SortDirection::Descending,
    )));
    let Some(SearchResults::Units(sorted)) = page.sorted_results() else {
        panic!("expected unit results");
    };
    assert_eq!(sorted[0].toughness, 6);
    assert_eq!(sorted[0].weapons.len(), 4);
}

#[tokio::test]
async fn name_and_faction_search_matches_every_card() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .and(query_param("name", "berzerker"))
        .and(query_param("faction", "world eaters"))
        .respond_with(search_ok(json!([
            unit_json(2, "Khorne Berzerkers", 4),
            unit_json(5, "Berzerker Champion", 4)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = SearchPage::new(RecordKind::Unit);
    page.form_mut()
        .set_field(FilterField::Name, Some("berzerker"))
        .unwrap();
    page.form_mut()
        .set_field(FilterField::Faction, Some("world eaters"))
        .unwrap();

    assert!(page.search(&catalog).await.unwrap());
    assert!(matches!(page.phase(), SearchPhase::Loaded(_)));

    let Some(SearchResults::Units(units)) = page.sorted_results() else {
        panic!("expected unit results");
    };
    assert_eq!(units.len(), 2);
    for unit in &units {
        assert!(unit.name.to_lowercase().contains("berzerker"), "{}", unit.name);
        assert!(
            unit.faction.name.to_lowercase().contains("world eaters"),
            "{}",
            unit.faction.name
        );
    }
}

#[tokio::test]
async fn empty_form_makes_no_request() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .respond_with(search_ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut page = SearchPage::new(RecordKind::Weapon);
    assert!(!page.search(&catalog).await.unwrap());
    assert_eq!(page.phase(), &SearchPhase::Idle);
}

#[tokio::test]
async fn link_mount_runs_search_once() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .and(query_param("faction", "Orks"))
        .and(query_param("minToughness", "5"))
        .respond_with(search_ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = SearchPage::new(RecordKind::Unit);
    let params = page.mount("?faction=Orks&minToughness=5").unwrap();
    let result = catalog.search(&params).await;
    page.complete(result);

    assert_eq!(page.phase(), &SearchPhase::NoResults);
    assert_eq!(page.status_line(), "No units found");
}

#[tokio::test]
async fn server_failure_sets_failed_phase() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/weapons/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "boom"
        })))
        .mount(&server)
        .await;

    let mut page = SearchPage::new(RecordKind::Weapon);
    page.form_mut()
        .numeric_field_change(FilterField::ArmorPenetration, "-1")
        .unwrap();
    let err = page.search(&catalog).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert_eq!(
        page.phase(),
        &SearchPhase::Failed("Failed to search weapons. Please try again.".into())
    );
    // The in-flight window is closed again.
    assert!(!page.form().is_in_flight());
}

#[tokio::test]
async fn missing_unit_is_not_found() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/units/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Unit not found"
        })))
        .mount(&server)
        .await;

    let state = DetailState::from_result(catalog.find_unit("404").await);
    assert_eq!(state, DetailState::NotFound);
}

#[tokio::test]
async fn factions_are_converted() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/factions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 1, "name": "Space Marines", "category": { "id": 1, "name": "Imperium" } }]
        })))
        .mount(&server)
        .await;

    let factions = catalog.factions().await.unwrap();
    let directory = grimdarkly_core::faction_directory(&factions, true);
    assert_eq!(directory.len(), 10);
    assert!(directory.iter().any(|e| e.name == "Space Marines" && !e.is_sub_faction()));
}
