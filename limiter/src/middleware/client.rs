use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use std::{future::Future, num::NonZeroU32, pin::Pin, rc::Rc, sync::Arc};

use crate::too_many_requests;

type KeyedLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// Tracked clients above which stale entries are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limiter keyed by the IP address of the connecting peer.
///
/// Mounted on the `/api` scope so a single client cannot
/// enumerate coupon codes.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<KeyedLimiter>,
}

impl ClientRateLimiter {
    pub fn new(permits_per_sec: NonZeroU32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::dashmap(Quota::per_second(permits_per_sec))),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClientRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = ClientRateLimiterService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(ClientRateLimiterService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct ClientRateLimiterService<S> {
    service: Rc<S>,
    limiter: Arc<KeyedLimiter>,
}

impl<S, B> Service<ServiceRequest> for ClientRateLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        // forwarded headers are client-controlled, so only the socket peer counts
        let client = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Box::pin(async move {
            if limiter.len() > PRUNE_THRESHOLD {
                limiter.retain_recent();
            }

            if let Err(not_until) = limiter.check_key(&client) {
                log::warn!("Rate limit reached for client {}", client);
                return Ok(too_many_requests(
                    req,
                    "Too many attempts. Please slow down.",
                    not_until.wait_time_from(limiter.clock().now()),
                ));
            }

            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}
