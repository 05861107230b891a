//! Mission network bridge.
//!
//! The HTTP client runs on its own thread with a single-threaded tokio
//! runtime. The HUD loop sends `MissionRequest`s and drains
//! `MissionResponse`s once per tick, so every cache mutation stays on the
//! HUD thread.

use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, error, info};

use voidline_core::config::MissionConfig;
use voidline_core::events::GameEvent;
use voidline_core::mission::{FactionStandings, Mission, MissionId};
use voidline_missions::client::MissionClient;
use voidline_missions::error::MissionError;

/// Work for the mission service.
#[derive(Debug, Clone)]
pub enum MissionRequest {
    /// Re-fetch the active missions.
    Refresh,
    /// Missions offered at a location.
    Available {
        location: String,
        standings: FactionStandings,
    },
    Accept(MissionId),
    Abandon(MissionId),
    CompleteObjective {
        mission_id: MissionId,
        objective_id: String,
    },
    ReportEvent(GameEvent),
    ClearActive,
    Shutdown,
}

/// Results handed back to the HUD loop.
#[derive(Debug)]
pub enum MissionResponse {
    /// Full active list; replaces the cache.
    Active(Vec<Mission>),
    Available(Vec<Mission>),
    /// Individual mission updates.
    Updated(Vec<Mission>),
    Abandoned(MissionId),
    Failed {
        context: &'static str,
        error: MissionError,
    },
}

pub struct MissionBridge {
    request_tx: mpsc::Sender<MissionRequest>,
    response_rx: mpsc::Receiver<MissionResponse>,
    handle: Option<JoinHandle<()>>,
}

impl MissionBridge {
    /// Spawn the bridge thread.
    pub fn spawn(config: &MissionConfig) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<MissionRequest>();
        let (response_tx, response_rx) = mpsc::channel::<MissionResponse>();
        let client = MissionClient::from_config(config);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let handle = std::thread::Builder::new()
            .name("voidline-missions".into())
            .spawn(move || {
                info!("mission bridge started");
                while let Ok(request) = request_rx.recv() {
                    if matches!(request, MissionRequest::Shutdown) {
                        break;
                    }
                    let response = runtime.block_on(execute(&client, request));
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                info!("mission bridge stopped");
            })?;

        Ok(Self {
            request_tx,
            response_rx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, request: MissionRequest) -> bool {
        self.request_tx.send(request).is_ok()
    }

    /// Everything that arrived since the last call.
    pub fn drain(&self) -> Vec<MissionResponse> {
        self.response_rx.try_iter().collect()
    }

    pub fn shutdown(mut self) {
        let _ = self.request_tx.send(MissionRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("mission bridge thread panicked");
            }
        }
    }
}

fn failed(context: &'static str) -> impl FnOnce(MissionError) -> MissionResponse {
    move |error| MissionResponse::Failed { context, error }
}

async fn execute(client: &MissionClient, request: MissionRequest) -> MissionResponse {
    debug!(?request, "mission request");
    match request {
        MissionRequest::Refresh => client
            .active()
            .await
            .map_or_else(failed("refresh"), MissionResponse::Active),
        MissionRequest::Available {
            location,
            standings,
        } => client
            .available(&location, &standings)
            .await
            .map_or_else(failed("available"), MissionResponse::Available),
        MissionRequest::Accept(id) => client
            .accept(&id)
            .await
            .map_or_else(failed("accept"), |m| MissionResponse::Updated(vec![m])),
        MissionRequest::Abandon(id) => match client.abandon(&id).await {
            Ok(_) => MissionResponse::Abandoned(id),
            Err(error) => failed("abandon")(error),
        },
        MissionRequest::CompleteObjective {
            mission_id,
            objective_id,
        } => client
            .complete_objective(&mission_id, &objective_id)
            .await
            .map_or_else(failed("objective"), |m| MissionResponse::Updated(vec![m])),
        MissionRequest::ReportEvent(event) => client
            .report_event(&event)
            .await
            .map_or_else(failed("event"), MissionResponse::Updated),
        MissionRequest::ClearActive => client
            .clear_active()
            .await
            .map_or_else(failed("clear"), |()| MissionResponse::Active(Vec::new())),
        MissionRequest::Shutdown => MissionResponse::Updated(Vec::new()),
    }
}
