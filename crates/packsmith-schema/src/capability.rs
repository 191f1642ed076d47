use crate::names::wire_enum;

wire_enum! {
    field = "capabilities";
    /// Opt-in engine feature a pack requests.
    pub enum Capability {
        ExperimentalCustomUi,
        Chemistry,
        Raytraced,
    }
}
