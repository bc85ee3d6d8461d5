use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Labels longer than this are rejected, matching the live service.
pub const MAX_LABEL_LEN: usize = 250;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub address: String,
    pub chain: u32,
    pub index: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub wallet_id: String,
    pub address: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Keychain {
    pub xpub: String,
    pub is_bit_go: bool,
}

#[derive(Deserialize)]
pub struct CreateAddress {
    pub wallet: String,
    pub chain: u32,
}

#[derive(Deserialize)]
pub struct SetLabel {
    pub label: String,
}

#[derive(Deserialize)]
pub struct LookupKeychain {
    pub xpub: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub addresses: BTreeMap<String, Vec<Address>>,
    pub labels: BTreeMap<(String, String), String>,
    pub keychains: HashMap<String, Keychain>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the service's `{"error": "..."}` shape.
#[derive(Debug)]
pub struct Failure(StatusCode, String);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/tx/{tx}", get(transaction_details))
        .route("/wallet", get(list_wallets))
        .route("/wallet/{wallet}/addresses", get(list_wallet_addresses))
        .route("/wallet/{wallet}/tx", get(list_wallet_transactions))
        .route("/wallet/{wallet}/address/{chain}", post(create_address))
        .route("/address/{address}", get(address_details))
        .route("/address/{address}/tx", get(address_transactions))
        .route("/labels", get(list_all_labels))
        .route("/labels/{wallet}", get(list_wallet_labels))
        .route("/labels/{wallet}/{address}", put(set_label).delete(delete_label))
        .route("/keychain", get(list_keychains))
        .route("/keychain/bitgo", post(create_bitgo_keychain))
        .route("/keychain/{xpub}", post(get_keychain))
        .route_layer(middleware::from_fn(require_bearer))
        .with_state(db);
    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock wallet service listening");
    }
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());
    if !authorized {
        return Failure(StatusCode::UNAUTHORIZED, "needs a valid access token".into()).into_response();
    }
    next.run(request).await
}

async fn transaction_details(Path(tx): Path<String>) -> Json<Value> {
    Json(json!({ "id": tx, "confirmations": 0, "inputs": [], "outputs": [] }))
}

async fn list_wallets(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let wallets: Vec<Value> = store.addresses.keys().map(|id| json!({ "id": id })).collect();
    Json(json!({ "wallets": wallets }))
}

async fn list_wallet_addresses(State(db): State<Db>, Path(wallet): Path<String>) -> Json<Value> {
    let store = db.read().await;
    let addresses = store.addresses.get(&wallet).cloned().unwrap_or_default();
    Json(json!({ "wallet": wallet, "count": addresses.len(), "addresses": addresses }))
}

async fn list_wallet_transactions(Path(wallet): Path<String>) -> Json<Value> {
    Json(json!({ "wallet": wallet, "start": 0, "count": 0, "total": 0, "transactions": [] }))
}

async fn create_address(
    State(db): State<Db>,
    Path((wallet, chain)): Path<(String, u32)>,
    Json(input): Json<CreateAddress>,
) -> Result<Json<Address>, Failure> {
    if input.wallet != wallet || input.chain != chain {
        return Err(Failure(StatusCode::BAD_REQUEST, "body does not match path".into()));
    }
    if chain > 1 {
        return Err(Failure(StatusCode::BAD_REQUEST, "chain must be 0 or 1".into()));
    }
    let mut store = db.write().await;
    let addresses = store.addresses.entry(wallet).or_default();
    let index = addresses.iter().filter(|a| a.chain == chain).count() as u32;
    let address = Address {
        address: format!("2N{}", Uuid::new_v4().simple()),
        chain,
        index,
    };
    addresses.push(address.clone());
    Ok(Json(address))
}

async fn address_details(Path(address): Path<String>) -> Json<Value> {
    Json(json!({ "address": address, "balance": 0, "confirmedBalance": 0, "received": 0, "sent": 0 }))
}

async fn address_transactions(Path(address): Path<String>) -> Json<Value> {
    Json(json!({ "address": address, "start": 0, "count": 0, "total": 0, "transactions": [] }))
}

fn labels_matching(store: &Store, wallet: Option<&str>) -> Vec<Label> {
    store
        .labels
        .iter()
        .filter(|((w, _), _)| wallet.map_or(true, |wallet| w == wallet))
        .map(|((w, a), label)| Label {
            wallet_id: w.clone(),
            address: a.clone(),
            label: label.clone(),
        })
        .collect()
}

async fn list_all_labels(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({ "labels": labels_matching(&store, None) }))
}

async fn list_wallet_labels(State(db): State<Db>, Path(wallet): Path<String>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({ "labels": labels_matching(&store, Some(wallet.as_str())) }))
}

async fn set_label(
    State(db): State<Db>,
    Path((wallet, address)): Path<(String, String)>,
    Json(input): Json<SetLabel>,
) -> Result<Json<Label>, Failure> {
    if input.label.chars().count() > MAX_LABEL_LEN {
        return Err(Failure(
            StatusCode::BAD_REQUEST,
            format!("label exceeds {MAX_LABEL_LEN} characters"),
        ));
    }
    let mut store = db.write().await;
    store
        .labels
        .insert((wallet.clone(), address.clone()), input.label.clone());
    Ok(Json(Label {
        wallet_id: wallet,
        address,
        label: input.label,
    }))
}

async fn delete_label(
    State(db): State<Db>,
    Path((wallet, address)): Path<(String, String)>,
) -> Result<Json<Label>, Failure> {
    let mut store = db.write().await;
    let label = store
        .labels
        .remove(&(wallet.clone(), address.clone()))
        .ok_or_else(|| Failure(StatusCode::NOT_FOUND, "label not found".into()))?;
    Ok(Json(Label {
        wallet_id: wallet,
        address,
        label,
    }))
}

async fn list_keychains(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let mut keychains: Vec<Keychain> = store.keychains.values().cloned().collect();
    keychains.sort_by(|a, b| a.xpub.cmp(&b.xpub));
    Json(json!({ "keychains": keychains }))
}

async fn get_keychain(
    State(db): State<Db>,
    Path(xpub): Path<String>,
    Json(input): Json<LookupKeychain>,
) -> Result<Json<Keychain>, Failure> {
    if input.xpub != xpub {
        return Err(Failure(StatusCode::BAD_REQUEST, "body does not match path".into()));
    }
    let store = db.read().await;
    store
        .keychains
        .get(&xpub)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure(StatusCode::NOT_FOUND, "keychain not found".into()))
}

async fn create_bitgo_keychain(State(db): State<Db>) -> Json<Keychain> {
    let keychain = Keychain {
        xpub: format!("xpub{}", Uuid::new_v4().simple()),
        is_bit_go: true,
    };
    db.write()
        .await
        .keychains
        .insert(keychain.xpub.clone(), keychain.clone());
    Json(keychain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keychain_serializes_camel_case() {
        let keychain = Keychain {
            xpub: "xpub1".to_string(),
            is_bit_go: true,
        };
        let json = serde_json::to_value(&keychain).unwrap();
        assert_eq!(json, json!({ "xpub": "xpub1", "isBitGo": true }));
    }

    #[test]
    fn label_serializes_wallet_id() {
        let label = Label {
            wallet_id: "W1".to_string(),
            address: "A1".to_string(),
            label: "Savings".to_string(),
        };
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["walletId"], "W1");
        assert_eq!(json["label"], "Savings");
    }

    #[test]
    fn create_address_rejects_missing_chain() {
        let result: Result<CreateAddress, _> = serde_json::from_str(r#"{"wallet":"W1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_address_accepts_numeric_chain() {
        let input: CreateAddress = serde_json::from_str(r#"{"wallet":"W1","chain":1}"#).unwrap();
        assert_eq!(input.wallet, "W1");
        assert_eq!(input.chain, 1);
    }

    #[test]
    fn labels_matching_filters_by_wallet() {
        let mut store = Store::default();
        store.labels.insert(("W1".into(), "A1".into()), "one".into());
        store.labels.insert(("W2".into(), "A2".into()), "two".into());

        assert_eq!(labels_matching(&store, None).len(), 2);
        let only_w2 = labels_matching(&store, Some("W2"));
        assert_eq!(only_w2.len(), 1);
        assert_eq!(only_w2[0].label, "two");
    }
}
