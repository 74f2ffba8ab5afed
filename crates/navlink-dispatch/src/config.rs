/// Controls session behaviour that differs between firmware generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    /// When true, selecting `s1` ends up streaming `a1`, as older firmware did
    /// (its selector fell through from the `Scaled1` case into `Ang1`).
    pub legacy_scaled1_fallthrough: bool,
}
