use service::BroadcastService;

#[derive(Clone)]
pub struct AppState {
    pub service: BroadcastService,
}
