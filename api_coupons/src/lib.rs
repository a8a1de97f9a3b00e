use actix_web::web;

pub mod routes {
    pub mod coupon;
}

pub mod services {
    pub mod discount;
    pub mod recorder;
    pub mod store;
    pub mod validator;
}

pub mod dtos {
    pub mod coupon;
}

/// Registers `POST /validate-coupon` and `POST /record-coupon-usage`.
pub fn mount_coupons(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::coupon::post_validate_coupon)
        .service(routes::coupon::post_record_coupon_usage);
}
