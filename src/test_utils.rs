#[cfg(test)]
pub mod test_utils {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use tokio::net::TcpListener;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Canned answer of the mock service: status code and raw body.
    pub type Reply = (StatusCode, String);

    #[derive(Clone, Default)]
    struct MockState {
        train_reply: Arc<Mutex<Option<Reply>>>,
        poll_replies: Arc<Mutex<VecDeque<Reply>>>,
        train_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
        polled_tickers: Arc<Mutex<Vec<String>>>,
    }

    /// Forecasting service stand-in listening on an ephemeral local port.
    pub struct MockService {
        pub base_url: String,
        state: MockState,
    }

    impl MockService {
        /// JSON bodies received on the train endpoint, in order.
        pub fn train_bodies(&self) -> Vec<serde_json::Value> {
            self.state.train_bodies.lock().unwrap().clone()
        }

        /// Tickers received on the predict endpoint, in order.
        pub fn polled_tickers(&self) -> Vec<String> {
            self.state.polled_tickers.lock().unwrap().clone()
        }
    }

    pub fn json_reply(body: serde_json::Value) -> Reply {
        (StatusCode::OK, body.to_string())
    }

    pub fn training_reply(progress: f64) -> Reply {
        json_reply(serde_json::json!({ "status": "training", "progress": progress }))
    }

    pub fn ready_reply() -> Reply {
        json_reply(serde_json::json!({
            "status": "ready",
            "historical": {
                "dates": ["2024-01-01", "2024-01-02"],
                "actual": [98.0, 100.0],
                "predicted": [97.5, 100.5]
            },
            "forecast": {
                "dates": ["2024-01-03", "2024-01-04"],
                "predicted": [101.0, 99.0]
            },
            "metrics": {
                "rmse": 1.5,
                "mae": 1.1,
                "last_updated": "2024-01-02T10:00:00Z"
            }
        }))
    }

    async fn train(State(state): State<MockState>, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
        state.train_bodies.lock().unwrap().push(body);
        state
            .train_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or((StatusCode::OK, r#"{"status":"training"}"#.to_string()))
    }

    async fn predict(State(state): State<MockState>, Path(ticker): Path<String>) -> impl IntoResponse {
        state.polled_tickers.lock().unwrap().push(ticker);
        let (status, body) = state
            .poll_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| training_reply(0.0));
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    }

    /// Start the mock service. `train_reply` of `None` accepts every train request;
    /// poll replies are served in order, then "training" forever.
    pub async fn spawn_mock_service(train_reply: Option<Reply>, poll_replies: Vec<Reply>) -> MockService {
        let state = MockState {
            train_reply: Arc::new(Mutex::new(train_reply)),
            poll_replies: Arc::new(Mutex::new(poll_replies.into())),
            ..Default::default()
        };

        let app = Router::new()
            .route("/api/train", post(train))
            .route("/api/predict/:ticker", get(predict))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Mock service has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service failed");
        });

        MockService {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Base URL of a port nothing listens on.
    pub async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind placeholder listener");
        let addr = listener.local_addr().expect("Placeholder listener has no address");
        drop(listener);
        format!("http://{}/api", addr)
    }

    /// Initialize tracing for tests with output to STDERR, level from RUST_LOG (default WARN).
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}
