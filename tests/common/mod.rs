#![allow(dead_code)]

use dw_hdmi::{Error, Regmap, Result};

pub const PRODUCT_ID0: u32 = 0x0002;
pub const PRODUCT_ID1: u32 = 0x0003;
pub const DESIGN_ID: u32 = 0x0000;
pub const REVISION_ID: u32 = 0x0001;
pub const CONFIG0_ID: u32 = 0x0004;
pub const CONFIG2_ID: u32 = 0x0006;
pub const IH_MUTE: u32 = 0x01ff;
pub const IH_I2CMPHY_STAT0: u32 = 0x0108;
pub const TX_INVID0: u32 = 0x0200;
pub const FC_INVIDCONF: u32 = 0x1000;
pub const FC_SCRAMBLER_CTRL: u32 = 0x10e1;
pub const FC_PACKET_TX_EN: u32 = 0x10e3;
pub const FC_DRM_UP: u32 = 0x1167;
pub const FC_DRM_HB0: u32 = 0x1168;
pub const FC_DRM_HB1: u32 = 0x1169;
pub const FC_DRM_PB0: u32 = 0x116a;
pub const FC_AUDSCHNLS7: u32 = 0x106e;
pub const FC_AUDSCHNLS8: u32 = 0x106f;
pub const PHY_CONF0: u32 = 0x3000;
pub const PHY_STAT0: u32 = 0x3004;
pub const PHY_I2CM_OPERATION: u32 = 0x3026;
pub const AUD_N1: u32 = 0x3200;
pub const AUD_N2: u32 = 0x3201;
pub const AUD_N3: u32 = 0x3202;
pub const AUD_CTS1: u32 = 0x3203;
pub const AUD_CTS2: u32 = 0x3204;
pub const AUD_CTS3: u32 = 0x3205;
pub const MC_CLKDIS: u32 = 0x4001;

/// DWC HDMI 3D TX PHY
pub const PHY_3D_TX: u8 = 0xf2;
/// Vendor PHY
pub const PHY_VENDOR: u8 = 0xfe;

/// Flat register file recording every write
///
/// PHY I2C transfers always complete; the PHY PLL locks when `phy_locked`
/// and HPD reads back `hpd`.
pub struct FakeRegmap {
    pub file: Vec<u8>,
    pub log: Vec<(u32, u8)>,
    pub phy_locked: bool,
    pub hpd: bool,
    /// Number of upcoming accesses that fail with a bus error
    pub fail_next: u32,
}

impl FakeRegmap {
    pub fn new(phy_id: u8) -> Self {
        let mut file = vec![0u8; 0x8000];
        file[DESIGN_ID as usize] = 0x20;
        file[REVISION_ID as usize] = 0x1a;
        file[PRODUCT_ID0 as usize] = 0xa0;
        file[PRODUCT_ID1 as usize] = 0x01;
        // I2S audio
        file[CONFIG0_ID as usize] = 0x10;
        file[CONFIG2_ID as usize] = phy_id;
        Self {
            file,
            log: Vec::new(),
            phy_locked: true,
            hpd: false,
            fail_next: 0,
        }
    }

    pub fn get(&self, reg: u32) -> u8 {
        self.file[reg as usize]
    }

    /// Position of the first write to `reg` in the log
    pub fn first_write(&self, reg: u32) -> Option<usize> {
        self.log.iter().position(|(r, _)| *r == reg)
    }

    /// Position of the last write to `reg` in the log
    pub fn last_write(&self, reg: u32) -> Option<usize> {
        self.log.iter().rposition(|(r, _)| *r == reg)
    }

    pub fn writes_to(&self, reg: u32) -> usize {
        self.log.iter().filter(|(r, _)| *r == reg).count()
    }

    fn bus(&mut self, reg: u32) -> Result<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(Error::Bus { reg });
        }
        Ok(())
    }
}

impl Regmap for FakeRegmap {
    fn read(&mut self, reg: u32) -> Result<u8> {
        self.bus(reg)?;
        Ok(match reg {
            IH_I2CMPHY_STAT0 => 0x02,
            PHY_STAT0 => u8::from(self.hpd) << 1 | u8::from(self.phy_locked),
            _ => self.file[reg as usize],
        })
    }

    fn write(&mut self, reg: u32, val: u8) -> Result<()> {
        self.bus(reg)?;
        self.file[reg as usize] = val;
        self.log.push((reg, val));
        Ok(())
    }
}
