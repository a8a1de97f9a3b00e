use std::sync::Arc;
use std::time::Instant;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::{ColoredString, Colorize};
use common::error::Res;
use common::jwt::JwtClaims;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::{debug, error, info};

/// Logs status, method, path, latency and caller of each request.
pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("-")
            .to_string();
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let res = match srv.call(req).await {
                Ok(res) => res,
                Err(err) => {
                    let status_code = err.as_response_error().status_code().as_u16();
                    error!(
                        "[{}] {} {} {} ip={} failed: {}",
                        colored_status(status_code),
                        colored_method(&method),
                        path.bright_white(),
                        format!("({}ms)", started.elapsed().as_millis()).bright_black(),
                        ip,
                        err,
                    );
                    return Err(err);
                }
            };

            // read on the way out; claims may be inserted by an inner middleware
            let caller = res
                .request()
                .extensions()
                .get::<Res<JwtClaims>>()
                .map(|claims| match claims {
                    Ok(c) => c
                        .sub
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| c.role.clone()),
                    Err(_) => "invalid-token".to_string(),
                })
                .unwrap_or_else(|| "-".to_string());

            let status_code = res.status().as_u16();
            let elapsed = started.elapsed().as_millis();

            info!(
                "[{}] {} {} {} caller={} ip={}",
                colored_status(status_code),
                colored_method(&method),
                path.bright_white(),
                format!("({}ms)", elapsed).bright_black(),
                caller.bright_blue(),
                ip,
            );
            if status_code >= 400 {
                debug!("  {} {} answered {}", method, path, status_code);
            }

            Ok(res.map_into_boxed_body())
        })
    }
}

fn colored_status(status_code: u16) -> ColoredString {
    match status_code {
        200..=299 => status_code.to_string().green(),
        300..=399 => status_code.to_string().yellow(),
        400..=499 => status_code.to_string().bright_red(),
        _ => status_code.to_string().red(),
    }
}

fn colored_method(method: &str) -> ColoredString {
    match method {
        "GET" => method.blue(),
        "POST" => method.yellow(),
        "PUT" => method.purple(),
        "DELETE" => method.red(),
        _ => method.normal(),
    }
}
