use super::models::Capability;

/// Typed view of the capability fields the `sku` table stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuCapabilities {
    pub v_cpus: i32,
    pub memory_gb: String,
    pub cpu_architecture_type: String,
    pub max_network_interfaces: String,
}

impl SkuCapabilities {
    /// Picks the recognized capabilities out of a catalog record's list.
    ///
    /// Extraction never fails. Missing names leave their field at the zero
    /// value, and a `vCPUs` value that is not an integer is stored as 0. When a
    /// name repeats, the last value wins.
    pub fn extract(capabilities: &[Capability]) -> Self {
        let mut extracted = Self::default();

        for capability in capabilities {
            match capability.name.as_str() {
                "vCPUs" => extracted.v_cpus = parse_count(&capability.value),
                "MemoryGB" => extracted.memory_gb = capability.value.clone(),
                "CpuArchitectureType" => {
                    extracted.cpu_architecture_type = capability.value.clone()
                }
                "MaxNetworkInterfaces" => {
                    extracted.max_network_interfaces = capability.value.clone()
                }
                _ => {}
            }
        }

        extracted
    }
}

fn parse_count(value: &str) -> i32 {
    value.parse().unwrap_or(0)
}
