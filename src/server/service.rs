use super::request::parse_request;
use super::response::write_response;
use crate::app::App;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;

/// `may_minihttp` service delegating every request to the front controller.
#[derive(Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    #[must_use]
    pub fn new(app: Arc<App>) -> Self {
        AppService { app }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let response = self.app.handle(parsed);
        write_response(res, response);
        Ok(())
    }
}
