use std::sync::Arc;

use disasterhub_client::auth::Authenticator;
use disasterhub_client::directory::EmergencyDirectory;
use disasterhub_client::feed::ReportFeed;
use disasterhub_client::geolocation::GeolocationProvider;
use disasterhub_client::report_form::ReportFormClient;
use disasterhub_client::routing::RoutingClient;
use disasterhub_client::submit::EmergencyClient;
use disasterhub_types::geo::ReliefCenter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub feed: Arc<ReportFeed>,
    pub emergencies: EmergencyClient,
    pub directory: EmergencyDirectory,
    pub report_form: ReportFormClient,
    pub routing: RoutingClient,
    pub relief_centers: Vec<ReliefCenter>,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub authenticator: Arc<dyn Authenticator>,
    pub jwt_secret: String,
}
