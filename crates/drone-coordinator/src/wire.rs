//! Wire formats exchanged with drone firmware: fixed-size, little-endian,
//! manually encoded/decoded without `unsafe` or `repr(packed)` field access.

use crate::error::CoordinatorError;

const MM_PER_M: f64 = 1000.0;
const I16_LIMIT_M: f64 = 32.767;

/// Clamp a float-meters value into int16-millimeters range and round.
fn meters_to_mm(value_m: f64) -> i16 {
    let clamped = value_m.clamp(-I16_LIMIT_M, I16_LIMIT_M);
    (clamped * MM_PER_M).round() as i16
}

fn mm_to_meters(value_mm: i16) -> f64 {
    f64::from(value_mm) / MM_PER_M
}

/// Minimal bitfield helper generator, avoiding a dependency the rest of the
/// stack never otherwise needs for two small flag sets.
macro_rules! bitflags_lite {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: u8 {
            $($variant:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name(pub u8);

        impl $name {
            $(
                pub const $variant: Self = Self($value);
            )*

            #[must_use]
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            #[must_use]
            pub fn bits(self) -> u8 {
                self.0
            }

            #[must_use]
            pub fn from_bits(bits: u8) -> Self {
                Self(bits)
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

bitflags_lite! {
    /// bit0=EMERGENCY, bit1=STYLE_UPDATE, bit2=FORCE_PATTERN
    pub struct CommandFlags: u8 {
        EMERGENCY = 0b0000_0001;
        STYLE_UPDATE = 0b0000_0010;
        FORCE_PATTERN = 0b0000_0100;
    }
}

bitflags_lite! {
    /// bit0=AIRBORNE, bit1=PATTERN_ACTIVE, bit2=EMERGENCY, bit3=LOW_BATTERY, bit4=COMM_LOST
    pub struct StatusFlags: u8 {
        AIRBORNE = 0b0000_0001;
        PATTERN_ACTIVE = 0b0000_0010;
        EMERGENCY = 0b0000_0100;
        LOW_BATTERY = 0b0000_1000;
        COMM_LOST = 0b0001_0000;
    }
}

/// Outbound command to a drone: 20 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneCommand {
    pub pattern_id: u16,
    pub target_pos: (f64, f64, f64),
    pub target_vel: (f64, f64, f64),
    pub flags: CommandFlags,
}

impl DroneCommand {
    pub const WIRE_LEN: usize = 20;

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        let mut buf = [0u8; Self::WIRE_LEN];
        buf[0..2].copy_from_slice(&self.pattern_id.to_le_bytes());
        buf[2..4].copy_from_slice(&meters_to_mm(self.target_pos.0).to_le_bytes());
        buf[4..6].copy_from_slice(&meters_to_mm(self.target_pos.1).to_le_bytes());
        buf[6..8].copy_from_slice(&meters_to_mm(self.target_pos.2).to_le_bytes());
        buf[8..10].copy_from_slice(&meters_to_mm(self.target_vel.0).to_le_bytes());
        buf[10..12].copy_from_slice(&meters_to_mm(self.target_vel.1).to_le_bytes());
        buf[12..14].copy_from_slice(&meters_to_mm(self.target_vel.2).to_le_bytes());
        buf[14] = self.flags.bits();
        // buf[15..20] reserved, already zero
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoordinatorError> {
        if bytes.len() < Self::WIRE_LEN {
            return Err(CoordinatorError::PacketTooShort {
                expected: Self::WIRE_LEN,
                actual: bytes.len(),
            });
        }
        let pattern_id = u16::from_le_bytes([bytes[0], bytes[1]]);
        let target_pos = (
            mm_to_meters(i16::from_le_bytes([bytes[2], bytes[3]])),
            mm_to_meters(i16::from_le_bytes([bytes[4], bytes[5]])),
            mm_to_meters(i16::from_le_bytes([bytes[6], bytes[7]])),
        );
        let target_vel = (
            mm_to_meters(i16::from_le_bytes([bytes[8], bytes[9]])),
            mm_to_meters(i16::from_le_bytes([bytes[10], bytes[11]])),
            mm_to_meters(i16::from_le_bytes([bytes[12], bytes[13]])),
        );
        let flags = CommandFlags::from_bits(bytes[14]);
        Ok(Self {
            pattern_id,
            target_pos,
            target_vel,
            flags,
        })
    }
}

/// Inbound telemetry from a drone: 18 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryPacket {
    pub position: (f64, f64, f64),
    pub velocity: (f64, f64, f64),
    pub battery_pct: f32,
    pub pattern_id: u16,
    pub status_flags: StatusFlags,
    pub position_quality: f32,
}

impl TelemetryPacket {
    pub const WIRE_LEN: usize = 18;

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        let mut buf = [0u8; Self::WIRE_LEN];
        buf[0..2].copy_from_slice(&meters_to_mm(self.position.0).to_le_bytes());
        buf[2..4].copy_from_slice(&meters_to_mm(self.position.1).to_le_bytes());
        buf[4..6].copy_from_slice(&meters_to_mm(self.position.2).to_le_bytes());
        buf[6..8].copy_from_slice(&meters_to_mm(self.velocity.0).to_le_bytes());
        buf[8..10].copy_from_slice(&meters_to_mm(self.velocity.1).to_le_bytes());
        buf[10..12].copy_from_slice(&meters_to_mm(self.velocity.2).to_le_bytes());
        buf[12] = (self.battery_pct.clamp(0.0, 1.0) * 200.0).round() as u8;
        buf[13..15].copy_from_slice(&self.pattern_id.to_le_bytes());
        buf[15] = self.status_flags.bits();
        buf[16] = (self.position_quality.clamp(0.0, 1.0) * 255.0).round() as u8;
        // buf[17] reserved, already zero
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoordinatorError> {
        if bytes.len() < Self::WIRE_LEN {
            return Err(CoordinatorError::PacketTooShort {
                expected: Self::WIRE_LEN,
                actual: bytes.len(),
            });
        }
        let position = (
            mm_to_meters(i16::from_le_bytes([bytes[0], bytes[1]])),
            mm_to_meters(i16::from_le_bytes([bytes[2], bytes[3]])),
            mm_to_meters(i16::from_le_bytes([bytes[4], bytes[5]])),
        );
        let velocity = (
            mm_to_meters(i16::from_le_bytes([bytes[6], bytes[7]])),
            mm_to_meters(i16::from_le_bytes([bytes[8], bytes[9]])),
            mm_to_meters(i16::from_le_bytes([bytes[10], bytes[11]])),
        );
        let battery_pct = f32::from(bytes[12]) / 200.0;
        let pattern_id = u16::from_le_bytes([bytes[13], bytes[14]]);
        let status_flags = StatusFlags::from_bits(bytes[15]);
        let position_quality = f32::from(bytes[16]) / 255.0;
        Ok(Self {
            position,
            velocity,
            battery_pct,
            pattern_id,
            status_flags,
            position_quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drone_command_round_trips_through_bytes() {
        let command = DroneCommand {
            pattern_id: 42,
            target_pos: (1.5, -2.25, 3.0),
            target_vel: (0.5, 0.0, -0.25),
            flags: CommandFlags::EMERGENCY,
        };
        let bytes = command.to_bytes();
        assert_eq!(bytes.len(), DroneCommand::WIRE_LEN);
        let decoded = DroneCommand::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.pattern_id, 42);
        assert!((decoded.target_pos.0 - 1.5).abs() < 1e-3);
        assert!((decoded.target_pos.1 + 2.25).abs() < 1e-3);
        assert!(decoded.flags.contains(CommandFlags::EMERGENCY));
    }

    #[test]
    fn position_clamps_beyond_int16_millimeter_range() {
        let mm = meters_to_mm(1000.0);
        assert_eq!(mm, (I16_LIMIT_M * MM_PER_M).round() as i16);
    }

    #[test]
    fn telemetry_packet_round_trips_through_bytes() {
        let packet = TelemetryPacket {
            position: (0.1, 0.2, 1.0),
            velocity: (1.0, 0.0, 0.0),
            battery_pct: 0.75,
            pattern_id: 7,
            status_flags: StatusFlags::AIRBORNE | StatusFlags::PATTERN_ACTIVE,
            position_quality: 0.9,
        };
        let bytes = packet.to_bytes();
        assert_eq!(bytes.len(), TelemetryPacket::WIRE_LEN);
        let decoded = TelemetryPacket::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.pattern_id, 7);
        assert!((decoded.battery_pct - 0.75).abs() < 0.01);
        assert!(decoded.status_flags.contains(StatusFlags::AIRBORNE));
        assert!(decoded.status_flags.contains(StatusFlags::PATTERN_ACTIVE));
    }

    #[test]
    fn truncated_packet_is_rejected() {
        let bytes = [0u8; 4];
        assert!(DroneCommand::from_bytes(&bytes).is_err());
        assert!(TelemetryPacket::from_bytes(&bytes).is_err());
    }
}
