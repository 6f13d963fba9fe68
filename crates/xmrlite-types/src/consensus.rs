//! Monero consensus rules relevant to spend planning.
//!
//! Hard-fork version gates for fee and transaction-shape decisions, exposed
//! as a predicate value so callers never compare raw version numbers.
//!
//! Reference: monero/src/cryptonote_config.h HF_VERSION_* defines

// =============================================================================
// Hard Fork Versions
// =============================================================================

/// Hard fork version constants for feature gating.
pub struct HfVersion;

impl HfVersion {
    pub const RCT: u8 = 4;
    pub const DYNAMIC_FEE: u8 = 4;
    pub const PER_BYTE_FEE: u8 = 8;
    pub const BULLETPROOF: u8 = 8;
    pub const SMALLER_BP: u8 = 10;
    pub const MIN_MIXIN_10: u8 = 12;
    pub const CLSAG: u8 = 13;
    pub const BULLETPROOF_PLUS: u8 = 15;
    pub const VIEW_TAGS: u8 = 15;
    pub const MIN_MIXIN_15: u8 = 15;
    pub const SCALING_2021: u8 = 15;
}

// =============================================================================
// Fee Granularity
// =============================================================================

/// Quantization mask assumed when the server does not supply one.
pub const DEFAULT_FEE_QUANTIZATION_MASK: u64 = 10_000;

// =============================================================================
// Fork Rules
// =============================================================================

/// Protocol-version predicate driving fee and output-selection behavior.
///
/// Built once per negotiation from the fork version the server reports, then
/// consulted wherever rules diverge across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkRules {
    version: u8,
}

impl ForkRules {
    pub fn from_version(version: u8) -> Self {
        ForkRules { version }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// True when the rule introduced at `rule_version` is in force.
    pub fn enabled(&self, rule_version: u8) -> bool {
        self.version >= rule_version
    }

    pub fn use_rct(&self) -> bool {
        self.enabled(HfVersion::RCT)
    }

    pub fn use_per_byte_fee(&self) -> bool {
        self.enabled(HfVersion::PER_BYTE_FEE)
    }

    pub fn use_bulletproofs(&self) -> bool {
        self.enabled(HfVersion::BULLETPROOF)
    }

    pub fn use_clsag(&self) -> bool {
        self.enabled(HfVersion::CLSAG)
    }

    pub fn use_bulletproof_plus(&self) -> bool {
        self.enabled(HfVersion::BULLETPROOF_PLUS)
    }

    pub fn use_view_tags(&self) -> bool {
        self.enabled(HfVersion::VIEW_TAGS)
    }

    /// Decoys mixed with each real input: 15 once ring size 16 is enforced,
    /// 10 before that.
    pub fn default_mixin(&self) -> u32 {
        if self.enabled(HfVersion::MIN_MIXIN_15) {
            15
        } else {
            10
        }
    }

    pub fn default_ring_size(&self) -> u32 {
        self.default_mixin() + 1
    }
}
