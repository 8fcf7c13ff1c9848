//! HTTP server adapter.
//!
//! Binds the transport-agnostic [`Router`] to the ESP-IDF HTTP server.
//! Every known path gets a GET handler that forwards the full URI
//! (query string included) to the router and writes its response back.
//! Unregistered paths get the server's own 404.
//!
//! The router sits behind a mutex: httpd may run handlers from more than
//! one worker, and the command interface needs `&mut`.

use std::sync::{Arc, Mutex, PoisonError};

use crate::app::ports::{ActuatorPort, SchedulerProbe};
use crate::app::router::{Response, Router};

/// Paths served by [`Router`].
pub const ROUTES: [&str; 6] = ["/", "/xml", "/json", "/UPDATE_SLIDER", "/BUTTON_0", "/BUTTON_1"];

/// Router shared between handler closures.
pub type SharedRouter<A, P> = Arc<Mutex<Router<A, P>>>;

pub fn shared<A: ActuatorPort, P: SchedulerProbe>(router: Router<A, P>) -> SharedRouter<A, P> {
    Arc::new(Mutex::new(router))
}

/// Run one request through the router. A poisoned lock is recovered:
/// the router holds no invariant a panicking handler could break.
pub fn dispatch<A: ActuatorPort, P: SchedulerProbe>(
    router: &SharedRouter<A, P>,
    uri: &str,
) -> Response {
    router
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .handle(uri)
}

#[cfg(target_os = "espidf")]
pub use esp::start_server;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use log::info;

    use super::{ROUTES, SharedRouter, dispatch};
    use crate::app::ports::{ActuatorPort, SchedulerProbe};

    /// Start httpd and register every route. Keep the returned server
    /// alive for as long as requests should be served.
    pub fn start_server<A, P>(
        router: SharedRouter<A, P>,
    ) -> anyhow::Result<EspHttpServer<'static>>
    where
        A: ActuatorPort + Send + 'static,
        P: SchedulerProbe + Send + 'static,
    {
        let mut server = EspHttpServer::new(&Configuration {
            stack_size: 8192,
            ..Default::default()
        })?;

        for path in ROUTES {
            let router = router.clone();
            server.fn_handler::<anyhow::Error, _>(path, Method::Get, move |req| {
                let uri = req.uri().to_owned();
                let resp = dispatch(&router, &uri);
                let mut out = req.into_response(
                    resp.status,
                    None,
                    &[("Content-Type", resp.content_type)],
                )?;
                out.write_all(resp.body.as_bytes())?;
                Ok(())
            })?;
        }

        info!("HTTP: {} routes registered", ROUTES.len());
        Ok(server)
    }
}
