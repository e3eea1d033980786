//! Compact variable-field encoding of [`ActionRequestData`].
//!
//! ```text
//! u16 LE  action id
//! u8      flags (see PackFlags)
//! [3 x f32 LE]          position       if HAS_POSITION
//! [3 x f32 LE]          direction      if HAS_DIRECTION
//! [u16 LE n][n x u64 LE] target ids    if HAS_TARGET_IDS
//! [f32 LE]              amount         if HAS_AMOUNT
//! ```
//!
//! Zero-valued optional fields are omitted, and absent fields decode to
//! zero / `None`.

use bitflags::bitflags;

use crate::action::{ActionId, ActionRequestData, WireError};
use crate::state::{ActorId, Vec3};

bitflags! {
    /// Presence and boolean bits carried in the request header.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PackFlags: u8 {
        const HAS_POSITION    = 1 << 0;
        const HAS_DIRECTION   = 1 << 1;
        const HAS_TARGET_IDS  = 1 << 2;
        const HAS_AMOUNT      = 1 << 3;
        const SHOULD_QUEUE    = 1 << 4;
        const SHOULD_CLOSE    = 1 << 5;
        const CANCEL_MOVEMENT = 1 << 6;
    }
}

impl PackFlags {
    fn of(request: &ActionRequestData) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::HAS_POSITION, !request.position.is_zero());
        flags.set(Self::HAS_DIRECTION, !request.direction.is_zero());
        flags.set(Self::HAS_TARGET_IDS, request.target_ids.is_some());
        flags.set(Self::HAS_AMOUNT, request.amount != 0.0);
        flags.set(Self::SHOULD_QUEUE, request.should_queue);
        flags.set(Self::SHOULD_CLOSE, request.should_close);
        flags.set(Self::CANCEL_MOVEMENT, request.cancel_movement);
        flags
    }
}

impl ActionRequestData {
    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        let flags = PackFlags::of(self);
        let mut len = 3;
        if flags.contains(PackFlags::HAS_POSITION) {
            len += 12;
        }
        if flags.contains(PackFlags::HAS_DIRECTION) {
            len += 12;
        }
        if flags.contains(PackFlags::HAS_TARGET_IDS) {
            len += 2 + 8 * self.targets().len();
        }
        if flags.contains(PackFlags::HAS_AMOUNT) {
            len += 4;
        }
        len
    }

    /// Appends the compact encoding to `buf`.
    ///
    /// # Errors
    ///
    /// [`WireError::TooManyTargets`] when the target list exceeds `u16::MAX`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), WireError> {
        let flags = PackFlags::of(self);
        let count = u16::try_from(self.targets().len())
            .map_err(|_| WireError::TooManyTargets(self.targets().len()))?;

        buf.reserve(self.encoded_len());
        buf.extend_from_slice(&self.action_id.0.to_le_bytes());
        buf.push(flags.bits());
        if flags.contains(PackFlags::HAS_POSITION) {
            put_vec3(buf, self.position);
        }
        if flags.contains(PackFlags::HAS_DIRECTION) {
            put_vec3(buf, self.direction);
        }
        if flags.contains(PackFlags::HAS_TARGET_IDS) {
            buf.extend_from_slice(&count.to_le_bytes());
            for target in self.targets() {
                buf.extend_from_slice(&target.0.to_le_bytes());
            }
        }
        if flags.contains(PackFlags::HAS_AMOUNT) {
            buf.extend_from_slice(&self.amount.to_le_bytes());
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decodes one request occupying the whole of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader { bytes };
        let request = reader.request()?;
        if !reader.bytes.is_empty() {
            return Err(WireError::TrailingBytes(reader.bytes.len()));
        }
        Ok(request)
    }
}

fn put_vec3(buf: &mut Vec<u8>, v: Vec3) {
    for c in [v.x, v.y, v.z] {
        buf.extend_from_slice(&c.to_le_bytes());
    }
}

struct Reader<'b> {
    bytes: &'b [u8],
}

impl<'b> Reader<'b> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let Some((head, rest)) = self.bytes.split_first_chunk::<N>() else {
            return Err(WireError::Truncated {
                needed: N,
                remaining: self.bytes.len(),
            });
        };
        self.bytes = rest;
        Ok(*head)
    }

    fn f32(&mut self) -> Result<f32, WireError> {
        self.take::<4>().map(f32::from_le_bytes)
    }

    fn vec3(&mut self) -> Result<Vec3, WireError> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn request(&mut self) -> Result<ActionRequestData, WireError> {
        let action_id = ActionId(u16::from_le_bytes(self.take::<2>()?));
        let [raw] = self.take::<1>()?;
        let flags = PackFlags::from_bits(raw)
            .ok_or(WireError::ReservedFlags(raw & !PackFlags::all().bits()))?;

        let mut request = ActionRequestData::new(action_id);
        if flags.contains(PackFlags::HAS_POSITION) {
            request.position = self.vec3()?;
        }
        if flags.contains(PackFlags::HAS_DIRECTION) {
            request.direction = self.vec3()?;
        }
        if flags.contains(PackFlags::HAS_TARGET_IDS) {
            let count = u16::from_le_bytes(self.take::<2>()?) as usize;
            let mut targets = Vec::with_capacity(count.min(self.bytes.len() / 8));
            for _ in 0..count {
                targets.push(ActorId(u64::from_le_bytes(self.take::<8>()?)));
            }
            request.target_ids = Some(targets);
        }
        if flags.contains(PackFlags::HAS_AMOUNT) {
            request.amount = self.f32()?;
        }
        request.should_queue = flags.contains(PackFlags::SHOULD_QUEUE);
        request.should_close = flags.contains(PackFlags::SHOULD_CLOSE);
        request.cancel_movement = flags.contains(PackFlags::CANCEL_MOVEMENT);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untargeted_request_is_three_bytes() {
        let bytes = ActionRequestData::new(ActionId(0x0102)).encode().unwrap();
        assert_eq!(bytes, vec![0x02, 0x01, 0x00]);
    }

    #[test]
    fn targeted_closing_request_layout() {
        let request = ActionRequestData::new(ActionId(7))
            .with_target(ActorId(0x0A0B))
            .with_amount(2.5)
            .closing();
        let bytes = request.encode().unwrap();

        assert_eq!(bytes.len(), request.encoded_len());
        assert_eq!(bytes[2], (PackFlags::HAS_TARGET_IDS | PackFlags::HAS_AMOUNT | PackFlags::SHOULD_CLOSE).bits());
        assert_eq!(&bytes[3..5], &[1, 0]);
        assert_eq!(&bytes[5..13], &0x0A0Bu64.to_le_bytes());
        assert_eq!(ActionRequestData::decode(&bytes).unwrap(), request);
    }

    #[test]
    fn empty_target_list_survives() {
        let request = ActionRequestData::new(ActionId(1)).with_targets([]);
        let decoded = ActionRequestData::decode(&request.encode().unwrap()).unwrap();
        assert_eq!(decoded.target_ids, Some(Vec::new()));
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert_eq!(
            ActionRequestData::decode(&[1, 0]),
            Err(WireError::Truncated { needed: 1, remaining: 0 })
        );
        assert_eq!(
            ActionRequestData::decode(&[1, 0, 0x80]),
            Err(WireError::ReservedFlags(0x80))
        );
        assert_eq!(
            ActionRequestData::decode(&[1, 0, PackFlags::HAS_AMOUNT.bits(), 0, 0]),
            Err(WireError::Truncated { needed: 4, remaining: 2 })
        );
        assert_eq!(
            ActionRequestData::decode(&[1, 0, 0, 9]),
            Err(WireError::TrailingBytes(1))
        );
    }
}
