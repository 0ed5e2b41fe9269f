//! Shared test utilities
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pizza_assistant::api::ApiServer;
use pizza_assistant::vendor::DemoVendor;
use pizza_assistant::voice::{SpeechInput, SpeechOutput};
use pizza_assistant::{
    Conversation, Error, OrderGateway, OrderRequest, OrderResult, PizzaVendor, Result,
    StoreLookupResult,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Speech input replaying a fixed script, then the quit phrase
pub struct ScriptedInput {
    lines: VecDeque<String>,
    listens: Arc<Mutex<u32>>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            listens: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared counter of listen cycles
    pub fn listens(&self) -> Arc<Mutex<u32>> {
        self.listens.clone()
    }
}

#[async_trait(?Send)]
impl SpeechInput for ScriptedInput {
    async fn listen(&mut self) -> String {
        *self.listens.lock().unwrap() += 1;
        self.lines.pop_front().unwrap_or_else(|| "quit".to_string())
    }
}

/// Speech output recording everything spoken
#[derive(Clone, Default)]
pub struct RecordingOutput {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingOutput {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.spoken.lock().unwrap().last().cloned()
    }
}

#[async_trait(?Send)]
impl SpeechOutput for RecordingOutput {
    async fn speak(&mut self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Conversation client with a canned reply, or always failing
#[derive(Default)]
pub struct FakeConversation {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeConversation {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Conversation for FakeConversation {
    async fn reply(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| Error::Conversation("model unavailable".to_string()))
    }
}

/// Order gateway with fixed results that records its calls
pub struct FakeGateway {
    lookup: StoreLookupResult,
    place: OrderResult,
    lookups: Mutex<Vec<String>>,
    placed: Mutex<Vec<OrderRequest>>,
}

impl FakeGateway {
    pub fn new(lookup: StoreLookupResult, place: OrderResult) -> Arc<Self> {
        Arc::new(Self {
            lookup,
            place,
            lookups: Mutex::new(Vec::new()),
            placed: Mutex::new(Vec::new()),
        })
    }

    /// Store `12345` accepts every order as `order_id`
    pub fn accepting(order_id: &str) -> Arc<Self> {
        Self::new(
            StoreLookupResult::found("12345"),
            OrderResult::placed(order_id),
        )
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn placed(&self) -> Vec<OrderRequest> {
        self.placed.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.lookups().len() + self.placed().len()
    }
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn lookup_store(&self, address: &str) -> StoreLookupResult {
        self.lookups.lock().unwrap().push(address.to_string());
        self.lookup.clone()
    }

    async fn place_order(&self, order: &OrderRequest) -> OrderResult {
        self.placed.lock().unwrap().push(order.clone());
        self.place.clone()
    }
}

/// An order accepted by [`RecordingVendor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedOrder {
    pub order_id: String,
    pub store_id: String,
    pub order: OrderRequest,
}

/// Demo vendor that remembers what it accepted
#[derive(Default)]
pub struct RecordingVendor {
    inner: DemoVendor,
    accepted: Mutex<Vec<AcceptedOrder>>,
}

impl RecordingVendor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn accepted(&self) -> Vec<AcceptedOrder> {
        self.accepted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PizzaVendor for RecordingVendor {
    async fn find_store(&self, address: &str) -> Result<Option<String>> {
        self.inner.find_store(address).await
    }

    async fn place_order(&self, store_id: &str, order: &OrderRequest) -> Result<String> {
        let order_id = self.inner.place_order(store_id, order).await?;
        self.accepted.lock().unwrap().push(AcceptedOrder {
            order_id: order_id.clone(),
            store_id: store_id.to_string(),
            order: order.clone(),
        });
        Ok(order_id)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Vendor whose backend is always down
pub struct FailingVendor;

#[async_trait]
impl PizzaVendor for FailingVendor {
    async fn find_store(&self, _address: &str) -> Result<Option<String>> {
        Err(Error::Vendor("vendor unreachable".to_string()))
    }

    async fn place_order(&self, _store_id: &str, _order: &OrderRequest) -> Result<String> {
        Err(Error::Vendor("vendor unreachable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Ordering microservice running on a loopback port
pub struct TestService {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start the ordering microservice for a vendor on an ephemeral port
pub async fn spawn_service(vendor: Arc<dyn PizzaVendor>) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("no local addr");
    let (tx, rx) = oneshot::channel::<()>();

    let server = ApiServer::new(vendor, 0);
    tokio::spawn(server.run_on(listener, async move {
        let _ = rx.await;
    }));

    TestService {
        base_url: format!("http://{addr}"),
        shutdown: Some(tx),
    }
}

/// HTTP client with a short timeout for tests
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("failed to build client")
}
