pub mod config;
pub mod domain {
    pub mod payment;
    pub mod routing;
}
pub mod http {
    pub mod handlers {
        pub mod payments;
        pub mod psps;
        pub mod routing;
    }
}
pub mod psp;
pub mod repo {
    pub mod payment_attempts_repo;
    pub mod payments_repo;
    pub mod psps_repo;
    pub mod routing_config_repo;
}
pub mod router {
    pub mod selection;
    pub mod validate;
}
pub mod service {
    pub mod attempt_loop;
    pub mod routing_service;
}

#[derive(Clone)]
pub struct AppState {
    pub routing_service: service::routing_service::RoutingService,
    pub routing_config_repo: repo::routing_config_repo::RoutingConfigRepo,
    pub psps_repo: repo::psps_repo::PspsRepo,
    pub payment_attempts_repo: repo::payment_attempts_repo::PaymentAttemptsRepo,
}
