//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tokio::sync::OwnedMutexGuard;

use eragenetica_domain::{Confirmation, Identity, JutsuId, NewJutsu, ProfileChanges};
use eragenetica_shared::{
    AdjustRequest, CharacterSheetView, ConfirmRequest, ErrorCode, JutsuUseData, NotesRequest,
    ReorderRequest, RosterView, SessionInfo, WriteStatus,
};

use super::sessions::RosterSession;
use super::{ApiError, ApiState, Auth};
use crate::use_cases::{CharacterSheet, CharacterSheetError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/session", get(session_info).delete(logout))
        // Character sheet
        .route("/api/character", get(get_character))
        .route("/api/character/health", post(adjust_health))
        .route("/api/character/chakra", post(adjust_chakra))
        .route("/api/character/jutsus", post(add_jutsu))
        .route(
            "/api/character/jutsus/{id}",
            put(update_jutsu).delete(delete_jutsu),
        )
        .route("/api/character/jutsus/{id}/use", post(use_jutsu))
        .route(
            "/api/character/profile",
            post(begin_profile_edit)
                .patch(edit_profile)
                .delete(cancel_profile_edit),
        )
        .route("/api/character/profile/save", post(save_profile))
        .route("/api/character/notes", put(save_notes))
        // Admin roster
        .route("/api/admin/roster", get(get_roster))
        .route("/api/admin/roster/reorder", post(reorder_roster))
        .route("/api/admin/roster/default", post(save_default_order))
        .route("/api/admin/roster/reset", post(reset_to_default_order))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Session
// =============================================================================

async fn session_info(Auth(identity): Auth) -> Json<SessionInfo> {
    Json(SessionInfo {
        user_id: identity.uid().to_string(),
        admin: identity.is_admin(),
        landing: identity.landing_route().to_string(),
    })
}

async fn logout(State(state): State<Arc<ApiState>>, Auth(identity): Auth) -> StatusCode {
    if state.sessions.end(identity.uid()) {
        tracing::info!(user_id = %identity.uid(), "Sessions ended");
    }
    StatusCode::NO_CONTENT
}

// =============================================================================
// Character sheet
// =============================================================================

type SheetResult = Result<Json<CharacterSheetView>, ApiError>;

/// The caller's sheet, loaded if it is not yet.
async fn loaded_sheet(
    state: &ApiState,
    identity: &Identity,
) -> Result<OwnedMutexGuard<CharacterSheet>, ApiError> {
    let mut sheet = state.sessions.sheet(&state.app, identity).lock_owned().await;
    if !sheet.is_loaded() {
        sheet
            .load()
            .await
            .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    }
    Ok(sheet)
}

/// Fresh read of the caller's character. An open profile editor is kept.
async fn get_character(State(state): State<Arc<ApiState>>, Auth(identity): Auth) -> SheetResult {
    let mut sheet = state.sessions.sheet(&state.app, &identity).lock_owned().await;
    if !sheet.is_loaded() || sheet.draft().is_none() {
        sheet
            .load()
            .await
            .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    }
    Ok(Json(sheet.view()))
}

async fn adjust_health(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<AdjustRequest>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .adjust_health(req.delta)
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

async fn adjust_chakra(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<AdjustRequest>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .adjust_chakra(req.delta)
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

async fn add_jutsu(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(new_jutsu): Json<NewJutsu>,
) -> Result<(StatusCode, Json<CharacterSheetView>), ApiError> {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .add_jutsu(new_jutsu)
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok((StatusCode::CREATED, Json(sheet.view())))
}

async fn update_jutsu(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Path(id): Path<String>,
    Json(new_jutsu): Json<NewJutsu>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .update_jutsu(JutsuId::new(id), new_jutsu)
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

async fn delete_jutsu(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Path(id): Path<String>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .delete_jutsu(&JutsuId::new(id))
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

async fn use_jutsu(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Path(id): Path<String>,
) -> Result<Json<JutsuUseData>, ApiError> {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    let outcome = sheet
        .use_jutsu(&JutsuId::new(id))
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(JutsuUseData {
        chakra: write_status(outcome.chakra),
        health: write_status(outcome.health),
        sheet: sheet.view(),
    }))
}

fn write_status(result: Result<(), CharacterSheetError>) -> WriteStatus {
    match result {
        Ok(()) => WriteStatus::Saved,
        Err(e) => WriteStatus::Failed {
            error: e.user_message(),
        },
    }
}

async fn begin_profile_edit(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    if let Err(e) = sheet.begin_profile_edit().map(|_| ()) {
        return Err(ApiError::from_sheet(&sheet, e));
    }
    Ok(Json(sheet.view()))
}

async fn edit_profile(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(changes): Json<ProfileChanges>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    if let Err(e) = sheet.edit_profile(changes).map(|_| ()) {
        return Err(ApiError::from_sheet(&sheet, e));
    }
    Ok(Json(sheet.view()))
}

async fn cancel_profile_edit(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet.cancel_profile_edit();
    Ok(Json(sheet.view()))
}

async fn save_profile(State(state): State<Arc<ApiState>>, Auth(identity): Auth) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .save_profile()
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

async fn save_notes(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<NotesRequest>,
) -> SheetResult {
    let mut sheet = loaded_sheet(&state, &identity).await?;
    sheet
        .save_notes(req.notes)
        .await
        .map_err(|e| ApiError::from_sheet(&sheet, e))?;
    Ok(Json(sheet.view()))
}

// =============================================================================
// Admin roster
// =============================================================================

type RosterResult = Result<Json<RosterView>, ApiError>;

async fn roster_session(
    state: &ApiState,
    identity: &Identity,
) -> Result<Arc<RosterSession>, ApiError> {
    state
        .sessions
        .roster(&state.app, identity)
        .await
        .map_err(|e| ApiError::Forbidden(e.user_message(identity.uid())))
}

async fn get_roster(State(state): State<Arc<ApiState>>, Auth(identity): Auth) -> RosterResult {
    let session = roster_session(&state, &identity).await?;
    let mut roster = session.roster().lock().await;
    if !session.is_live() {
        if let Err(e) = roster.refresh().await {
            return Err(ApiError::from_roster(&roster, e));
        }
    }

    let view = roster.view();
    let load_failed = view
        .error
        .as_ref()
        .is_some_and(|e| matches!(e.code, ErrorCode::PermissionDenied | ErrorCode::RosterLoadFailed));
    if load_failed {
        return Err(ApiError::Roster(view));
    }
    Ok(Json(view))
}

async fn reorder_roster(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<ReorderRequest>,
) -> RosterResult {
    let session = roster_session(&state, &identity).await?;
    let mut roster = session.roster().lock().await;
    if let Err(e) = roster.reorder(req.from, req.to).await {
        return Err(ApiError::from_roster(&roster, e));
    }
    Ok(Json(roster.view()))
}

async fn save_default_order(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<ConfirmRequest>,
) -> RosterResult {
    let session = roster_session(&state, &identity).await?;
    let mut roster = session.roster().lock().await;
    if let Err(e) = roster
        .save_default_order(Confirmation::from(req.confirm))
        .await
    {
        return Err(ApiError::from_roster(&roster, e));
    }
    Ok(Json(roster.view()))
}

async fn reset_to_default_order(
    State(state): State<Arc<ApiState>>,
    Auth(identity): Auth,
    Json(req): Json<ConfirmRequest>,
) -> RosterResult {
    let session = roster_session(&state, &identity).await?;
    let mut roster = session.roster().lock().await;
    if let Err(e) = roster
        .reset_to_default_order(Confirmation::from(req.confirm))
        .await
    {
        return Err(ApiError::from_roster(&roster, e));
    }
    Ok(Json(roster.view()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, response::Response, Router};
    use serde_json::Value;
    use tower::ServiceExt;

    use eragenetica_domain::UserId;

    use crate::api::{auth::USER_ID_HEADER, ApiState};
    use crate::app::App;
    use crate::infrastructure::claims::ConfiguredClaims;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory_store::InMemoryDocumentStore;

    pub const NOW_MILLIS: i64 = 1_700_000_000_000;

    /// API state over a fresh in-memory store with `admins` holding the claim.
    pub fn memory_state<'a>(
        admins: impl IntoIterator<Item = &'a str>,
    ) -> (Arc<ApiState>, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let claims = ConfiguredClaims::new(admins.into_iter().map(|id| UserId::new(id).unwrap()));
        let app = App::new(
            store.clone(),
            store.clone(),
            Arc::new(claims),
            Arc::new(FixedClock::at_millis(NOW_MILLIS)),
        );
        (Arc::new(ApiState::new(Arc::new(app))), store)
    }

    pub async fn read_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub fn request(method: &str, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, user);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Send one request and decode the JSON answer (`Null` for empty bodies).
    pub async fn send(router: &Router, request: Request<Body>) -> (u16, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let body = read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::String(body))
        };
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::test_support::{memory_state, request, send, NOW_MILLIS};
    use crate::api::router;

    fn app() -> (axum::Router, std::sync::Arc<crate::infrastructure::memory_store::InMemoryDocumentStore>) {
        let (state, store) = memory_state(["gm"]);
        (router(state), store)
    }

    #[tokio::test]
    async fn health_needs_no_identity() {
        let (router, _) = app();
        let req = axum::http::Request::builder()
            .uri("/api/health")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, body) = send(&router, req).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!("OK"));
    }

    #[tokio::test]
    async fn session_reports_landing_route() {
        let (router, _) = app();
        let (_, admin) = send(&router, request("GET", "/api/session", "gm", None)).await;
        let (_, player) = send(&router, request("GET", "/api/session", "p1", None)).await;

        assert_eq!(admin["landing"], "/admin");
        assert_eq!(admin["admin"], true);
        assert_eq!(player["landing"], "/character");
        assert_eq!(player["userId"], "p1");
    }

    #[tokio::test]
    async fn new_player_goes_through_first_time_setup() {
        let (router, store) = app();

        let (status, sheet) = send(&router, request("GET", "/api/character", "p1", None)).await;
        assert_eq!(status, 200);
        assert_eq!(sheet["firstTime"], true);
        assert_eq!(sheet["editing"], true);
        assert_eq!(sheet["character"]["name"], "Novo Aventureiro");
        assert!(store.character_document("p1").await.is_none());

        let changes = json!({ "name": "Sakura", "maxChakra": 80 });
        let (status, sheet) = send(
            &router,
            request("PATCH", "/api/character/profile", "p1", Some(changes)),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(sheet["draft"]["name"], "Sakura");

        let (status, sheet) = send(
            &router,
            request("POST", "/api/character/profile/save", "p1", None),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(sheet["firstTime"], false);
        assert_eq!(sheet["editing"], false);
        assert_eq!(sheet["character"]["maxChakra"], 80);

        let stored = store.character_document("p1").await.unwrap();
        assert_eq!(stored["name"], "Sakura");
    }

    #[tokio::test]
    async fn resource_adjustments_are_clamped() {
        let (router, store) = app();
        store
            .put_character_document("p1", json!({ "name": "Lee", "currentHealth": 3, "maxHealth": 100 }))
            .await;

        let (status, sheet) = send(
            &router,
            request("POST", "/api/character/health", "p1", Some(json!({ "delta": -5 }))),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(sheet["character"]["currentHealth"], 0);

        let (_, sheet) = send(
            &router,
            request("POST", "/api/character/health", "p1", Some(json!({ "delta": 500 }))),
        )
        .await;
        assert_eq!(sheet["character"]["currentHealth"], 100);
        assert_eq!(store.character_document("p1").await.unwrap()["currentHealth"], 100);
    }

    #[tokio::test]
    async fn jutsu_lifecycle() {
        let (router, store) = app();
        store
            .put_character_document(
                "p1",
                json!({ "name": "Naruto", "currentChakra": 50, "maxChakra": 50, "currentHealth": 100 }),
            )
            .await;

        let new_jutsu = json!({ "name": " Rasengan ", "chakraCost": 20, "healthCost": 5, "actionType": "Padrão" });
        let (status, sheet) = send(
            &router,
            request("POST", "/api/character/jutsus", "p1", Some(new_jutsu)),
        )
        .await;
        assert_eq!(status, 201);
        let id = NOW_MILLIS.to_string();
        assert_eq!(sheet["character"]["jutsus"][0]["id"], id.as_str());
        assert_eq!(sheet["character"]["jutsus"][0]["name"], "Rasengan");

        let (status, used) = send(
            &router,
            request("POST", &format!("/api/character/jutsus/{id}/use"), "p1", None),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(used["chakra"]["status"], "saved");
        assert_eq!(used["health"]["status"], "saved");
        assert_eq!(used["sheet"]["character"]["currentChakra"], 30);
        assert_eq!(used["sheet"]["character"]["currentHealth"], 95);

        let edit = json!({ "name": "Rasengan Gigante", "chakraCost": 40, "actionType": "Parcial" });
        let (status, sheet) = send(
            &router,
            request("PUT", &format!("/api/character/jutsus/{id}"), "p1", Some(edit)),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(sheet["character"]["jutsus"][0]["actionType"], "Parcial");
        assert_eq!(sheet["character"]["jutsus"][0]["usable"], false);

        let (status, sheet) = send(
            &router,
            request("DELETE", &format!("/api/character/jutsus/{id}"), "p1", None),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(sheet["character"]["jutsus"], json!([]));
        assert_eq!(store.character_document("p1").await.unwrap()["jutsus"], json!([]));
    }

    #[tokio::test]
    async fn invalid_jutsu_requests_are_client_errors() {
        let (router, store) = app();
        store.put_character_document("p1", json!({ "name": "Hinata" })).await;

        let (status, body) = send(
            &router,
            request("POST", "/api/character/jutsus", "p1", Some(json!({ "name": "   " }))),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "INVALID_REQUEST");

        let (status, _) = send(
            &router,
            request("POST", "/api/character/jutsus/missing/use", "p1", None),
        )
        .await;
        assert_eq!(status, 404);
        assert!(store.character_document("p1").await.unwrap().get("jutsus").is_none());
    }

    #[tokio::test]
    async fn malformed_document_reads_as_character_not_found() {
        let (router, store) = app();
        store.put_character_document("p1", json!("not a character")).await;

        let (status, sheet) = send(&router, request("GET", "/api/character", "p1", None)).await;

        assert_eq!(status, 404);
        assert_eq!(sheet["error"]["code"], "CHARACTER_NOT_FOUND");
        assert!(sheet.get("character").map_or(true, |c| c.is_null()));
    }

    #[tokio::test]
    async fn notes_are_saved_on_their_own() {
        let (router, store) = app();
        store.put_character_document("p1", json!({ "name": "Shikamaru" })).await;

        let (status, sheet) = send(
            &router,
            request("PUT", "/api/character/notes", "p1", Some(json!({ "notes": "Que saco." }))),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(sheet["character"]["notes"], "Que saco.");
        let stored = store.character_document("p1").await.unwrap();
        assert_eq!(stored["notes"], "Que saco.");
        assert_eq!(stored["name"], "Shikamaru");
    }

    #[tokio::test]
    async fn roster_is_admin_only() {
        let (router, _) = app();
        let (status, body) = send(&router, request("GET", "/api/admin/roster", "p1", None)).await;
        assert_eq!(status, 403);
        assert_eq!(body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn admin_orders_the_roster() {
        let (router, store) = app();
        for (id, name) in [("a", "Ana"), ("b", "Bruno"), ("c", "Carla")] {
            store.put_character_document(id, json!({ "name": name })).await;
        }

        let (status, roster) = send(&router, request("GET", "/api/admin/roster", "gm", None)).await;
        assert_eq!(status, 200);
        assert_eq!(roster["loading"], false);
        assert_eq!(roster["characters"][0]["name"], "Ana");

        let (status, roster) = send(
            &router,
            request("POST", "/api/admin/roster/reorder", "gm", Some(json!({ "from": 2, "to": 0 }))),
        )
        .await;
        assert_eq!(status, 200);
        let names: Vec<&str> = roster["characters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Carla", "Ana", "Bruno"]);

        let (status, _) = send(
            &router,
            request("POST", "/api/admin/roster/reorder", "gm", Some(json!({ "from": 0, "to": 9 }))),
        )
        .await;
        assert_eq!(status, 400);

        let (status, _) = send(
            &router,
            request("POST", "/api/admin/roster/default", "gm", Some(json!({}))),
        )
        .await;
        assert_eq!(status, 200);
        assert!(store.admin_settings_document("gm").await.unwrap()["defaultCharacterOrder"].is_null());

        send(
            &router,
            request("POST", "/api/admin/roster/default", "gm", Some(json!({ "confirm": true }))),
        )
        .await;
        assert_eq!(
            store.admin_settings_document("gm").await.unwrap()["defaultCharacterOrder"],
            json!(["c", "a", "b"])
        );
    }

    #[tokio::test]
    async fn logout_drops_live_sessions() {
        let (state, _store) = memory_state(["gm"]);
        let router = router(state.clone());
        send(&router, request("GET", "/api/admin/roster", "gm", None)).await;
        let gm = eragenetica_domain::UserId::new("gm").unwrap();
        assert!(state.sessions.has_sessions(&gm));

        let (status, _) = send(&router, request("DELETE", "/api/session", "gm", None)).await;

        assert_eq!(status, 204);
        assert!(!state.sessions.has_sessions(&gm));
    }
}
