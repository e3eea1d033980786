use bitflags::bitflags;

bitflags! {
    /// Tracks which replicated fields of an [`ActorState`](crate::state::ActorState)
    /// changed since the last drain.
    ///
    /// Each bit represents one field that peers observe. Unreplicated fields
    /// (movement, facing) never set a bit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ReplicatedFields: u8 {
        const HIT_POINTS    = 1 << 0;
        const LIFE_STATE    = 1 << 1;
        const ACTIVE_ACTION = 1 << 2;
        const TARGET        = 1 << 3;
        const STEALTH       = 1 << 4;
        const POSITION      = 1 << 5;
        const HELD_OBJECT   = 1 << 6;
    }
}
