use xxhash_rust::xxh3::Xxh3;

use crate::effect::params::{ParamSet, ParamValue};

const XXH3_SEED: u64 = 0x6a09_e667_f3bc_c908;

/// Contribution of an empty input slot to a downstream fingerprint.
pub const DISCONNECTED_INPUT_HASH: Hash64 = Hash64(0x9e37_79b9_7f4a_7c15);

/// Content hash of an effect: its class, parameter values and upstream fingerprints.
///
/// Time, region and view are not part of the identity; they belong to the request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash64(pub u64);

/// Fingerprint of one effect given the ordered fingerprints of its input slots.
///
/// Disconnected slots must be passed as [`DISCONNECTED_INPUT_HASH`]. Input order matters.
pub fn compute_fingerprint(class_name: &str, params: &ParamSet, inputs: &[Hash64]) -> Hash64 {
    let mut h = StableHasher::new();
    h.write_str(class_name);

    h.write_u32(params.len() as u32);
    for p in params.iter() {
        h.write_str(&p.name);
        write_param_value(&mut h, &p.value);
    }

    h.write_u32(inputs.len() as u32);
    for i in inputs {
        h.write_u64(i.0);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> Hash64 {
        Hash64(self.inner.digest())
    }
}

fn write_param_value(h: &mut StableHasher, v: &ParamValue) {
    match v {
        ParamValue::Bool(b) => {
            h.write_u8(0);
            h.write_bool(*b);
        }
        ParamValue::Int(i) => {
            h.write_u8(1);
            h.write_u64(*i as u64);
        }
        ParamValue::Double(d) => {
            h.write_u8(2);
            h.write_f64(*d);
        }
        ParamValue::Color(c) => {
            h.write_u8(3);
            for ch in c {
                h.write_f64(*ch);
            }
        }
        ParamValue::Text(s) => {
            h.write_u8(4);
            h.write_str(s);
        }
        ParamValue::Choice(i) => {
            h.write_u8(5);
            h.write_u32(*i);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/fingerprint.rs"]
mod tests;
