//! End-to-end integration tests for Dogmatch
//!
//! These tests drive the client-side stores through the real HTTP connector
//! against a mock dog service.

#[cfg(test)]
mod e2e_tests {
    use dogmatch_client::{FetchConfig, FetchConnector};
    use dogmatch_state::{FavoritesStore, Route, SessionStore};
    use dogmatch_storage::FileStore;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_state_survives_restart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let state_file = temp_dir.path().join("state.json");
        let api = Arc::new(
            FetchConnector::new(FetchConfig::default().with_base_url(server.uri())).unwrap(),
        );

        {
            let storage = Arc::new(FileStore::open(&state_file).unwrap());
            let session = SessionStore::new(api.clone(), storage.clone());
            assert_eq!(
                session.login("Ada", "ada@example.com").await.unwrap(),
                Some(Route::Search)
            );

            let mut favorites = FavoritesStore::new(storage);
            let dog = serde_json::from_value(json!({
                "id": "d1",
                "img": "https://img.example/d1.jpg",
                "name": "Rex",
                "age": 3,
                "zip_code": "60601",
                "breed": "Boxer"
            }))
            .unwrap();
            favorites.add(dog).unwrap();
        }

        // A fresh process sees the same session and favorites
        let storage = Arc::new(FileStore::open(&state_file).unwrap());
        let session = SessionStore::new(api, storage.clone());
        let favorites = FavoritesStore::new(storage);

        assert!(session.is_authenticated());
        assert_eq!(session.guard(Route::Match), Route::Match);
        assert_eq!(favorites.ids(), vec!["d1"]);
        assert_eq!(favorites.dogs()[0].name, "Rex");
    }
}
