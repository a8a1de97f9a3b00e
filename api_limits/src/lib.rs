use actix_web::web;

pub mod routes {
    pub mod admin;
    pub mod limits;
}

pub mod services {
    pub mod limits;
}

pub mod dtos {
    pub mod limits;
}

/// Registers the dashboard snapshot and the order-limit checkpoints.
pub fn mount_limits(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::limits::get_limits)
        .service(routes::limits::post_check_order_limit)
        .service(routes::limits::post_record_order);
}

/// Platform-admin routes; callers must hold the `super_admin` role.
pub fn mount_admin() -> actix_web::Scope {
    web::scope("/dashboard/admin").service(routes::admin::post_reset_usage)
}
