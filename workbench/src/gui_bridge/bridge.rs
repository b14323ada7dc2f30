use crate::gui_bridge::model::{EventReply, SessionStatus};
use crate::workflow::controller::Controller;
use log::{error, info, warn};
use smpcore::sidebar::PanelEvent;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

/// Controller shared between the HTTP handlers; one lock keeps edits atomic.
pub type SharedController = Arc<Mutex<Controller>>;

#[derive(Debug)]
struct PoisonedState;

impl warp::reject::Reject for PoisonedState {}

pub fn routes(
    state: SharedController,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let sidebar_route = warp::path("sidebar")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedController| async move {
            let guard = state
                .lock()
                .map_err(|_| warp::reject::custom(PoisonedState))?;
            Ok::<_, warp::Rejection>(warp::reply::json(&guard.view()))
        });

    let status_route = warp::path("status")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedController| async move {
            let guard = state
                .lock()
                .map_err(|_| warp::reject::custom(PoisonedState))?;
            let status = SessionStatus {
                profile: guard.profile().map(|p| p.name.clone()),
                samples: guard.profile().map(|p| p.sample_count()).unwrap_or(0),
                markers: guard.panel().markers().len(),
                drift: guard.drift(),
                metrics: guard.metrics(),
            };
            Ok::<_, warp::Rejection>(warp::reply::json(&status))
        });

    let event_route = warp::path("event")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .and_then(|event: PanelEvent, state: SharedController| async move {
            let mut guard = state.lock().map_err(|_| {
                error!("controller lock poisoned");
                warp::reject::custom(PoisonedState)
            })?;
            let status = guard.dispatch(event);
            let reply = EventReply {
                status,
                metrics: guard.metrics(),
            };
            Ok::<_, warp::Rejection>(warp::reply::json(&reply))
        });

    sidebar_route.or(status_route).or(event_route)
}

/// Bridge that hosts the sidebar HTTP endpoint on a background thread.
pub struct GuiBridge {
    state: SharedController,
}

impl GuiBridge {
    pub fn new(controller: Controller, address: SocketAddr) -> Self {
        let state: SharedController = Arc::new(Mutex::new(controller));
        let api = routes(state.clone());

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                info!("sidebar bridge listening on http://{}", address);
                warp::serve(api).run(address).await;
            });
        });

        Self { state }
    }

    pub fn state(&self) -> SharedController {
        self.state.clone()
    }

    pub fn publish_status(&self, message: &str) {
        match self.state.lock() {
            Ok(guard) => {
                let metrics = guard.metrics();
                info!(
                    "[GUI] {} (applied {}, rejected {}, failed {})",
                    message, metrics.applied, metrics.rejected, metrics.failed
                );
            }
            Err(_) => warn!("[GUI] {} (controller unavailable)", message),
        }
    }
}
