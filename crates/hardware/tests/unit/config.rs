//! `MmuConfig` deserialization from an actual file on disk, exercising the
//! same `serde_json::from_reader` path a real machine assembler would use
//! instead of embedding JSON in a string literal.

use std::io::Write as _;

use pretty_assertions::assert_eq;
use rvsim_mmu::MmuConfig;
use tempfile::NamedTempFile;

fn config_from_json(json: &str) -> MmuConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    let reader = std::fs::File::open(file.path()).unwrap();
    serde_json::from_reader(reader).unwrap()
}

#[test]
fn loads_defaults_from_an_empty_object_on_disk() {
    let config = config_from_json("{}");
    assert_eq!(config, MmuConfig::default());
}

#[test]
fn loads_overridden_fields_from_a_file_on_disk() {
    let config = config_from_json(r#"{"ram_base": 0, "ram_size": 4096, "tlb_size": 32}"#);
    assert_eq!(
        config,
        MmuConfig {
            ram_base: 0,
            ram_size: 4096,
            tlb_size: 32,
        }
    );
}
