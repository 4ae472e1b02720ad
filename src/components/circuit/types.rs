/// Named color scheme for the circuit background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchemeKind {
	/// Electric cyan on deep blue-black, with a magenta accent.
	#[default]
	Cyan,
	/// Violet on dark indigo, with a cyan accent.
	Purple,
	/// Phosphor green on near-black, with an amber accent.
	Green,
	/// Amber on warm black, with a cyan accent.
	Orange,
}

/// Resolved palette for one scheme. Channels are plain RGB; alpha is chosen
/// per draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	/// Node bodies and most packets.
	pub primary: (u8, u8, u8),
	/// Traces and the reference grid.
	pub secondary: (u8, u8, u8),
	/// Occasional packet highlight color.
	pub accent: (u8, u8, u8),
	/// Radial glows, sparks and the scan line.
	pub glow: (u8, u8, u8),
	/// Opaque near-black backdrop.
	pub background: (u8, u8, u8),
}

impl SchemeKind {
	/// The four-color palette this scheme renders with.
	pub fn palette(self) -> Palette {
		match self {
			SchemeKind::Cyan => Palette {
				primary: (0, 229, 255),
				secondary: (0, 140, 170),
				accent: (255, 64, 160),
				glow: (64, 240, 255),
				background: (4, 9, 14),
			},
			SchemeKind::Purple => Palette {
				primary: (186, 104, 255),
				secondary: (120, 70, 190),
				accent: (64, 220, 255),
				glow: (205, 140, 255),
				background: (9, 5, 16),
			},
			SchemeKind::Green => Palette {
				primary: (0, 230, 118),
				secondary: (0, 145, 85),
				accent: (255, 214, 64),
				glow: (80, 255, 150),
				background: (3, 12, 7),
			},
			SchemeKind::Orange => Palette {
				primary: (255, 152, 0),
				secondary: (190, 100, 10),
				accent: (64, 229, 255),
				glow: (255, 190, 70),
				background: (14, 8, 3),
			},
		}
	}
}
