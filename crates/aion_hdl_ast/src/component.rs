//! Sub-module instantiations.

use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// One port-map entry: `.port(signal)` / `port => signal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortBinding {
    /// The port on the instantiated module.
    pub port: Ident,
    /// The signal in the enclosing module.
    pub signal: Ident,
}

/// An instance of another module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// The instance name.
    pub name: Ident,
    /// The name of the instantiated module.
    pub module_name: Ident,
    /// Documentation attached in the source, if any.
    pub doc: Option<String>,
    /// The port map in declaration order.
    pub port_map: Vec<PortBinding>,
}

impl ComponentInstance {
    /// Creates an instance from `(port, signal)` pairs.
    pub fn new(name: Ident, module_name: Ident, bindings: &[(Ident, Ident)]) -> Self {
        Self {
            name,
            module_name,
            doc: None,
            port_map: bindings
                .iter()
                .map(|&(port, signal)| PortBinding { port, signal })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_keep_declaration_order() {
        let inst = ComponentInstance::new(
            Ident::from_raw(0),
            Ident::from_raw(1),
            &[
                (Ident::from_raw(10), Ident::from_raw(20)),
                (Ident::from_raw(11), Ident::from_raw(21)),
            ],
        );
        assert_eq!(inst.port_map.len(), 2);
        assert_eq!(inst.port_map[0].port, Ident::from_raw(10));
        assert_eq!(inst.port_map[1].signal, Ident::from_raw(21));
    }
}
