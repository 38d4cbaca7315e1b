use super::stream::{Stream, StreamDescriptor, StreamRole, StreamState};

pub(super) fn hot(id: &str, inlet: f64, outlet: f64, duty: f64) -> Stream {
    Stream::new(StreamDescriptor::new(id, inlet, outlet, duty).with_role(StreamRole::Hot)).unwrap()
}

pub(super) fn cold(id: &str, inlet: f64, outlet: f64, duty: f64) -> Stream {
    Stream::new(StreamDescriptor::new(id, inlet, outlet, duty).with_role(StreamRole::Cold)).unwrap()
}

pub(super) fn isothermal(id: &str, temperature: f64, duty: f64, role: StreamRole) -> Stream {
    let state = if role.is_hot() {
        StreamState::GasCondensation
    } else {
        StreamState::LiquidEvaporation
    };
    Stream::new(
        StreamDescriptor::new(id, temperature, temperature, duty)
            .with_role(role)
            .with_state(state),
    )
    .unwrap()
}

pub(super) fn utility(id: &str, inlet: f64, outlet: f64, role: StreamRole, cost: f64) -> Stream {
    Stream::new(
        StreamDescriptor::new(id, inlet, outlet, 0.0)
            .with_role(role)
            .with_cost(cost),
    )
    .unwrap()
}

/// Two hot and two cold streams with a pinch at 90 °C (shifted) for a 10 K
/// approach.
pub(super) fn textbook_streams() -> Vec<Stream> {
    vec![
        cold("c1", 40.0, 90.0, 150.0),
        cold("c2", 80.0, 110.0, 180.0),
        hot("h1", 125.0, 80.0, 180.0),
        hot("h2", 100.0, 60.0, 160.0),
    ]
}
