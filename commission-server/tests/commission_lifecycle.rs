//! End-to-end commission flows over in-memory SQLite

use axum::body::Body;
use commission_server::api::build_app;
use commission_server::auth::permissions::{
    COMMISSIONS_APPROVE, COMMISSIONS_PAY, COMMISSIONS_VIEW_ALL, CONFIG_MANAGE,
};
use commission_server::db::DbService;
use commission_server::{Config, CurrentUser, ErrorCode, ServerState};
use http::{Request, StatusCode};
use serde_json::{Value, json};
use shared::models::{
    CommissionConfigCreate, CommissionCreate, CommissionFilter, CommissionPay, CommissionReject,
    CommissionStatus, CommissionType, SettingsSource,
};
use tower::ServiceExt;

async fn state() -> ServerState {
    commission_server::init_logger();
    let db = DbService::in_memory().await.unwrap();
    ServerState::from_pool(Config::with_overrides("./target/test-data", 0), db.pool)
}

fn user(id: i64, permissions: &[&str]) -> CurrentUser {
    CurrentUser {
        id,
        company_id: 1,
        username: format!("user{id}"),
        role: "broker".into(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

fn manager() -> CurrentUser {
    user(
        100,
        &[
            CONFIG_MANAGE,
            COMMISSIONS_APPROVE,
            COMMISSIONS_PAY,
            COMMISSIONS_VIEW_ALL,
        ],
    )
}

fn rental(base_value: f64) -> CommissionCreate {
    CommissionCreate {
        title: "Aluguel casa Jardins".into(),
        commission_type: CommissionType::Rental,
        base_value,
        percentage: None,
        tax_percentage: Some(10.0),
        user_id: None,
        property_id: "PROP-77".into(),
        expected_payment_date: None,
        notes: Some("primeiro mês".into()),
    }
}

fn payment() -> CommissionPay {
    CommissionPay {
        payment_date: Some("2026-04-05".into()),
        payment_method: Some("TED".into()),
        transaction_id: Some("TED-998".into()),
    }
}

#[tokio::test]
async fn config_drives_rates_and_settings() {
    let state = state().await;
    let broker = user(7, &[]);

    state
        .config_store
        .create_config(
            &manager(),
            CommissionConfigCreate {
                sale_commission_percentage: 5.0,
                rental_commission_percentage: 8.0,
                company_profit_percentage: 40.0,
                company_rental_profit_percentage: 30.0,
            },
        )
        .await
        .unwrap();

    let loaded = state.settings_store.load_settings(&broker).await.unwrap();
    assert_eq!(loaded.source, SettingsSource::Merged);
    assert_eq!(loaded.settings.commission_rates.sale, 5.0);
    assert_eq!(loaded.settings.commission_rates.rental, 8.0);

    let c = state
        .commissions
        .create_commission(&broker, rental(2_500.0))
        .await
        .unwrap();
    assert_eq!(c.percentage, 8.0);
    assert_eq!(c.commission_value, 200.0);
    assert_eq!(c.tax_value, 20.0);
    assert_eq!(c.net_value, 180.0);

    // Second active config is a conflict until the first is deactivated
    let again = CommissionConfigCreate {
        sale_commission_percentage: 6.0,
        rental_commission_percentage: 10.0,
        company_profit_percentage: 40.0,
        company_rental_profit_percentage: 30.0,
    };
    let err = state
        .config_store
        .create_config(&manager(), again.clone())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigAlreadyActive);

    state.config_store.deactivate_config(&manager()).await.unwrap();
    let zero = state
        .commissions
        .create_commission(&broker, rental(2_500.0))
        .await
        .unwrap();
    assert_eq!(zero.commission_value, 0.0);

    state.config_store.create_config(&manager(), again).await.unwrap();
}

#[tokio::test]
async fn full_lifecycle_and_statistics() {
    let state = state().await;
    let broker = user(7, &[]);
    let commissions = &state.commissions;

    let mut ids = Vec::new();
    for base in [1_000.0, 2_000.0, 3_000.0] {
        let mut dto = rental(base);
        dto.percentage = Some(10.0);
        dto.tax_percentage = Some(0.0);
        ids.push(commissions.create_commission(&broker, dto).await.unwrap().id);
    }

    commissions.approve_commission(&manager(), ids[1]).await.unwrap();
    let paid = commissions
        .pay_commission(&manager(), ids[1], payment())
        .await
        .unwrap();
    assert_eq!(paid.status, CommissionStatus::Paid);

    commissions
        .reject_commission(
            &manager(),
            ids[2],
            CommissionReject {
                reason: Some("Contrato cancelado".into()),
            },
        )
        .await
        .unwrap();

    let err = commissions
        .pay_commission(&manager(), ids[1], payment())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStateTransition);

    let filter = CommissionFilter::default();
    let stats = state.statistics.get_statistics(&broker, &filter).await.unwrap();
    assert_eq!(stats.pending.count, 1);
    assert_eq!(stats.pending.value, 100.0);
    assert_eq!(stats.paid.value, 200.0);
    assert_eq!(stats.rejected.value, 300.0);
    assert_eq!(stats.total.count, 3);
    assert_eq!(stats.rental.value, 600.0);
    assert_eq!(stats.current_month_value, 600.0);
    assert_eq!(stats.monthly_goal, 10_000.0);
    assert_eq!(stats.goal_progress, 6.0);

    let again = state.statistics.get_statistics(&broker, &filter).await.unwrap();
    assert_eq!(stats, again);

    let only_paid = CommissionFilter {
        status: Some(CommissionStatus::Paid),
        ..Default::default()
    };
    let narrowed = state.statistics.get_statistics(&broker, &only_paid).await.unwrap();
    assert_eq!(narrowed.total.count, 1);

    // Asking for someone else's records excludes everything
    let foreign = CommissionFilter {
        user_id: Some(8),
        ..Default::default()
    };
    let foreign = state.statistics.get_statistics(&broker, &foreign).await.unwrap();
    assert_eq!(foreign.total.count, 0);
    assert_eq!(foreign.current_month_value, 0.0);

    // Another broker sees nothing of broker 7
    let other = state
        .statistics
        .get_statistics(&user(8, &[]), &filter)
        .await
        .unwrap();
    assert_eq!(other.total.count, 0);
}

#[tokio::test]
async fn concurrent_approve_and_reject_have_one_winner() {
    let state = state().await;
    let mut dto = rental(1_000.0);
    dto.percentage = Some(10.0);
    let id = state
        .commissions
        .create_commission(&user(7, &[]), dto)
        .await
        .unwrap()
        .id;

    let approver = manager();
    let reject = CommissionReject {
        reason: Some("duplicada".into()),
    };
    let (approved, rejected) = tokio::join!(
        state.commissions.approve_commission(&approver, id),
        state.commissions.reject_commission(&approver, id, reject),
    );

    assert!(approved.is_ok() != rejected.is_ok());
    let loser = approved.err().or(rejected.err()).unwrap();
    assert_eq!(loser.code, ErrorCode::InvalidStateTransition);
}

async fn send(state: &ServerState, request: Request<Body>) -> (StatusCode, Value) {
    let app = build_app(state).with_state(state.clone());
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn token(state: &ServerState, u: &CurrentUser) -> String {
    let jwt = state.get_jwt_service();
    let token = jwt
        .generate_token(u.id, u.company_id, &u.username, &u.role, &u.permissions)
        .unwrap();
    format!("Bearer {token}")
}

#[tokio::test]
async fn http_surface() {
    let state = state().await;

    let (status, body) = send(
        &state,
        Request::get("/api/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(
        &state,
        Request::get("/api/commissions").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());

    let broker = token(&state, &user(7, &[]));
    let (status, body) = send(
        &state,
        Request::post("/api/commissions")
            .header("authorization", &broker)
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "title": "Venda cobertura",
                    "type": "SALE",
                    "base_value": 100000.0,
                    "percentage": 6.0,
                    "tax_percentage": 15.0,
                    "property_id": "PROP-1"
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["net_value"], 5100.0);
    let id = body["data"]["id"].as_i64().unwrap();

    // Brokers cannot approve
    let (status, body) = send(
        &state,
        Request::post(format!("/api/commissions/{id}/approve"))
            .header("authorization", &broker)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::PermissionDenied.code());

    let manager = token(&state, &manager());
    let (status, _) = send(
        &state,
        Request::post(format!("/api/commissions/{id}/approve"))
            .header("authorization", &manager)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &state,
        Request::post(format!("/api/commissions/{id}/recalculate"))
            .header("authorization", &broker)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::InvalidStateTransition.code());

    let (status, body) = send(
        &state,
        Request::get("/api/commissions/statistics?status=APPROVED")
            .header("authorization", &broker)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["approved"]["count"], 1);
    assert_eq!(body["data"]["total"]["value"], 5100.0);

    let (status, body) = send(
        &state,
        Request::get("/api/commission-config")
            .header("authorization", &broker)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::ConfigNotFound.code());

    let (status, body) = send(
        &state,
        Request::post("/api/calculator/breakdown")
            .header("authorization", &broker)
            .header("content-type", "application/json")
            .body(Body::from(json!({ "commission_value": 100.0 }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_negative"], true);
}
