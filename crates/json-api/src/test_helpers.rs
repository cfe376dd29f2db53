//! Test helpers.

use std::sync::Arc;

use prd_tracker_app::{
    auth::{MockSessionService, SessionService},
    context::AppContext,
    gateway::{GatewayService, MockGatewayService},
};
use salvo::{affix_state::inject, prelude::*};

use crate::state::State;

fn strict_gateway_mock() -> MockGatewayService {
    let mut gateway = MockGatewayService::new();

    gateway.expect_list_documents().never();
    gateway.expect_dispatch().never();

    gateway
}

pub(crate) fn state_with(session: MockSessionService, gateway: MockGatewayService) -> Arc<State> {
    let session: Arc<dyn SessionService> = Arc::new(session);
    let gateway: Arc<dyn GatewayService> = Arc::new(gateway);

    State::from_app_context(AppContext { session, gateway })
}

pub(crate) fn service_with(
    session: MockSessionService,
    gateway: MockGatewayService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(session, gateway)))
            .push(route),
    )
}

pub(crate) fn service_with_session(session: MockSessionService, route: Router) -> Service {
    service_with(session, strict_gateway_mock(), route)
}
