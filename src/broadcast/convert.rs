//! Conversions: REST wire types → chain response.

use super::wire;
use super::{ChainResponse, Event, EventAttribute};

impl From<wire::WireAttribute> for EventAttribute {
    fn from(attr: wire::WireAttribute) -> Self {
        EventAttribute {
            key: attr.key,
            value: attr.value,
        }
    }
}

impl From<wire::WireEvent> for Event {
    fn from(event: wire::WireEvent) -> Self {
        Event {
            kind: event.kind,
            attributes: event.attributes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<wire::TxResponse> for ChainResponse {
    fn from(resp: wire::TxResponse) -> Self {
        ChainResponse {
            code: resp.code,
            codespace: resp.codespace,
            log: resp.raw_log,
            height: resp.height,
            hash: resp.txhash,
            gas_used: resp.gas_used,
            gas_wanted: resp.gas_wanted,
            events: resp.events.into_iter().map(Into::into).collect(),
        }
    }
}
