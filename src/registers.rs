//! The official documentation: <https://www.synopsys.com/designware-ip/interface-ip/hdmi.html>
//!
//! The controller exposes a byte wide register file. Offsets below are in
//! register units; the bus stride (`reg-io-width`) is applied by the regmap.

use tock_registers::register_bitfields;

/// Highest valid register offset
pub(crate) const HDMI_MAX_REGISTER: u32 = 0x7fff;

// Identification registers
pub(crate) const HDMI_DESIGN_ID: u32 = 0x0000;
pub(crate) const HDMI_REVISION_ID: u32 = 0x0001;
pub(crate) const HDMI_PRODUCT_ID0: u32 = 0x0002;
pub(crate) const HDMI_PRODUCT_ID1: u32 = 0x0003;
pub(crate) const HDMI_CONFIG0_ID: u32 = 0x0004;
pub(crate) const HDMI_CONFIG2_ID: u32 = 0x0006;
pub(crate) const HDMI_CONFIG3_ID: u32 = 0x0007;

pub(crate) const HDMI_PRODUCT_ID0_HDMI_TX: u8 = 0xa0;
pub(crate) const HDMI_PRODUCT_ID1_HDMI_TX: u8 = 0x01;
pub(crate) const HDMI_PRODUCT_ID1_HDCP: u8 = 0xc0;

// Interrupt registers
pub(crate) const HDMI_IH_PHY_STAT0: u32 = 0x0104;
pub(crate) const HDMI_IH_I2CMPHY_STAT0: u32 = 0x0108;

pub(crate) const HDMI_IH_MUTE_FC_STAT0: u32 = 0x0180;
pub(crate) const HDMI_IH_MUTE_FC_STAT1: u32 = 0x0181;
pub(crate) const HDMI_IH_MUTE_FC_STAT2: u32 = 0x0182;
pub(crate) const HDMI_IH_MUTE_AS_STAT0: u32 = 0x0183;
pub(crate) const HDMI_IH_MUTE_PHY_STAT0: u32 = 0x0184;
pub(crate) const HDMI_IH_MUTE_I2CM_STAT0: u32 = 0x0185;
pub(crate) const HDMI_IH_MUTE_CEC_STAT0: u32 = 0x0186;
pub(crate) const HDMI_IH_MUTE_VP_STAT0: u32 = 0x0187;
pub(crate) const HDMI_IH_MUTE_I2CMPHY_STAT0: u32 = 0x0188;
pub(crate) const HDMI_IH_MUTE_AHBDMAAUD_STAT0: u32 = 0x0189;
pub(crate) const HDMI_IH_MUTE: u32 = 0x01ff;

// Video sampler registers
pub(crate) const HDMI_TX_INVID0: u32 = 0x0200;
pub(crate) const HDMI_TX_INSTUFFING: u32 = 0x0201;
pub(crate) const HDMI_TX_GYDATA0: u32 = 0x0202;
pub(crate) const HDMI_TX_GYDATA1: u32 = 0x0203;
pub(crate) const HDMI_TX_RCRDATA0: u32 = 0x0204;
pub(crate) const HDMI_TX_RCRDATA1: u32 = 0x0205;
pub(crate) const HDMI_TX_BCBDATA0: u32 = 0x0206;
pub(crate) const HDMI_TX_BCBDATA1: u32 = 0x0207;

// Frame composer registers
pub(crate) const HDMI_FC_INVIDCONF: u32 = 0x1000;
pub(crate) const HDMI_FC_AUDICONF0: u32 = 0x1025;
pub(crate) const HDMI_FC_AUDICONF2: u32 = 0x1027;
pub(crate) const HDMI_FC_AUDSCONF: u32 = 0x1063;
pub(crate) const HDMI_FC_AUDSCHNLS7: u32 = 0x106e;
pub(crate) const HDMI_FC_AUDSCHNLS8: u32 = 0x106f;
pub(crate) const HDMI_FC_SCRAMBLER_CTRL: u32 = 0x10e1;
pub(crate) const HDMI_FC_PACKET_TX_EN: u32 = 0x10e3;
pub(crate) const HDMI_FC_DRM_UP: u32 = 0x1167;
pub(crate) const HDMI_FC_DRM_HB0: u32 = 0x1168;
pub(crate) const HDMI_FC_DRM_HB1: u32 = 0x1169;
pub(crate) const HDMI_FC_DRM_PB0: u32 = 0x116a;

// PHY registers
pub(crate) const HDMI_PHY_CONF0: u32 = 0x3000;
pub(crate) const HDMI_PHY_TST0: u32 = 0x3001;
pub(crate) const HDMI_PHY_STAT0: u32 = 0x3004;
pub(crate) const HDMI_PHY_MASK0: u32 = 0x3006;
pub(crate) const HDMI_PHY_POL0: u32 = 0x3007;

// PHY I2C master registers
pub(crate) const HDMI_PHY_I2CM_SLAVE_ADDR: u32 = 0x3020;
pub(crate) const HDMI_PHY_I2CM_ADDRESS_ADDR: u32 = 0x3021;
pub(crate) const HDMI_PHY_I2CM_DATAO_1_ADDR: u32 = 0x3022;
pub(crate) const HDMI_PHY_I2CM_DATAO_0_ADDR: u32 = 0x3023;
pub(crate) const HDMI_PHY_I2CM_OPERATION_ADDR: u32 = 0x3026;
pub(crate) const HDMI_PHY_I2CM_INT_ADDR: u32 = 0x3027;
pub(crate) const HDMI_PHY_I2CM_CTLINT_ADDR: u32 = 0x3028;

/// I2C slave address of the DWC Gen2 PHYs
pub const HDMI_PHY_I2CM_SLAVE_ADDR_PHY_GEN2: u8 = 0x69;
/// I2C slave address of the HEAC PHY
pub const HDMI_PHY_I2CM_SLAVE_ADDR_HEAC_PHY: u8 = 0x49;

// Audio sampler / clock regenerator registers
pub(crate) const HDMI_AUD_CONF0: u32 = 0x3100;
pub(crate) const HDMI_AUD_CONF1: u32 = 0x3101;
pub(crate) const HDMI_AUD_N1: u32 = 0x3200;
pub(crate) const HDMI_AUD_N2: u32 = 0x3201;
pub(crate) const HDMI_AUD_N3: u32 = 0x3202;
pub(crate) const HDMI_AUD_CTS1: u32 = 0x3203;
pub(crate) const HDMI_AUD_CTS2: u32 = 0x3204;
pub(crate) const HDMI_AUD_CTS3: u32 = 0x3205;
pub(crate) const HDMI_AUD_INPUTCLKFS: u32 = 0x3206;

// Main controller registers
pub(crate) const HDMI_MC_CLKDIS: u32 = 0x4001;
pub(crate) const HDMI_MC_SWRSTZ: u32 = 0x4002;
pub(crate) const HDMI_MC_FLOWCTRL: u32 = 0x4004;
pub(crate) const HDMI_MC_PHYRSTZ: u32 = 0x4005;
pub(crate) const HDMI_MC_HEACPHY_RST: u32 = 0x4007;

// Registers of the DWC HDMI 3D TX PHY, reached through the PHY I2C master
/// PHY I2C: PLL charge pump / CE control
pub const HDMI_3D_TX_PHY_CPCE_CTRL: u8 = 0x06;
/// PHY I2C: clock symbol and transmitter control
pub const HDMI_3D_TX_PHY_CKSYMTXCTRL: u8 = 0x09;
/// PHY I2C: clock calibration control
pub const HDMI_3D_TX_PHY_CKCALCTRL: u8 = 0x05;
/// PHY I2C: voltage level control
pub const HDMI_3D_TX_PHY_VLEVCTRL: u8 = 0x0e;
/// PHY I2C: PLL current control
pub const HDMI_3D_TX_PHY_CURRCTRL: u8 = 0x10;
/// PHY I2C: PLL phase bypass control
pub const HDMI_3D_TX_PHY_PLLPHBYCTRL: u8 = 0x13;
/// PHY I2C: PLL GMP control
pub const HDMI_3D_TX_PHY_GMPCTRL: u8 = 0x15;
/// PHY I2C: MSM control
pub const HDMI_3D_TX_PHY_MSM_CTRL: u8 = 0x17;
/// PHY I2C: transmission termination
pub const HDMI_3D_TX_PHY_TXTERM: u8 = 0x19;

/// MSM_CTRL: clock output selects the feedback clock
pub const HDMI_3D_TX_PHY_MSM_CTRL_CKO_SEL_FB_CLK: u16 = 0x3 << 13;
/// CKCALCTRL: override and disable clock termination
pub const HDMI_3D_TX_PHY_CKCALCTRL_OVERRIDE: u16 = 1 << 15;

register_bitfields![u8,
    pub(crate) PHY_CONF0 [
        PDZ OFFSET(7) NUMBITS(1) [],
        ENTMDS OFFSET(6) NUMBITS(1) [],
        SVSRET OFFSET(5) NUMBITS(1) [],
        GEN2_PDDQ OFFSET(4) NUMBITS(1) [],
        GEN2_TXPWRON OFFSET(3) NUMBITS(1) [],
        GEN2_ENHPDRXSENSE OFFSET(2) NUMBITS(1) [],
        SELDATAENPOL OFFSET(1) NUMBITS(1) [],
        SELDIPIF OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) PHY_TST0 [
        TESTCLR OFFSET(5) NUMBITS(1) [],
        TESTEN OFFSET(4) NUMBITS(1) [],
        TESTCLK OFFSET(0) NUMBITS(1) [],
    ],

    /// Shared by PHY_STAT0, PHY_INT0, PHY_MASK0 and PHY_POL0
    pub(crate) PHY_STAT0 [
        RX_SENSE OFFSET(4) NUMBITS(4) [],
        HPD OFFSET(1) NUMBITS(1) [],
        TX_PHY_LOCK OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) IH_PHY_STAT0 [
        RX_SENSE OFFSET(2) NUMBITS(4) [],
        TX_PHY_LOCK OFFSET(1) NUMBITS(1) [],
        HPD OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) IH_I2CMPHY_STAT0 [
        I2CMPHYDONE OFFSET(1) NUMBITS(1) [],
        I2CMPHYERROR OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) PHY_I2CM_OPERATION [
        WRITE OFFSET(4) NUMBITS(1) [],
        READ OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) PHY_I2CM_INT [
        DONE_POL OFFSET(3) NUMBITS(1) [],
        DONE_MASK OFFSET(2) NUMBITS(1) [],
    ],

    pub(crate) PHY_I2CM_CTLINT [
        NAC_POL OFFSET(7) NUMBITS(1) [],
        NAC_MASK OFFSET(6) NUMBITS(1) [],
        ARB_POL OFFSET(3) NUMBITS(1) [],
        ARB_MASK OFFSET(2) NUMBITS(1) [],
    ],

    pub(crate) IH_MUTE [
        MUTE_WAKEUP_INTERRUPT OFFSET(1) NUMBITS(1) [],
        MUTE_ALL_INTERRUPT OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) MC_CLKDIS [
        HDCPCLK_DISABLE OFFSET(6) NUMBITS(1) [],
        CECCLK_DISABLE OFFSET(5) NUMBITS(1) [],
        CSCCLK_DISABLE OFFSET(4) NUMBITS(1) [],
        AUDCLK_DISABLE OFFSET(3) NUMBITS(1) [],
        PREPCLK_DISABLE OFFSET(2) NUMBITS(1) [],
        TMDSCLK_DISABLE OFFSET(1) NUMBITS(1) [],
        PIXELCLK_DISABLE OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) MC_SWRSTZ [
        I2SSWRST_REQ OFFSET(3) NUMBITS(1) [],
        TMDSSWRST_REQ OFFSET(1) NUMBITS(1) [],
    ],

    pub(crate) MC_FLOWCTRL [
        CSC_IN_PATH OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) MC_PHYRSTZ [
        PHYRSTZ OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) MC_HEACPHY_RST [
        ASSERT OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) TX_INVID0 [
        INTERNAL_DE_GENERATOR OFFSET(7) NUMBITS(1) [],
        VIDEO_MAPPING OFFSET(0) NUMBITS(5) [],
    ],

    pub(crate) TX_INSTUFFING [
        BDBDATA_STUFFING OFFSET(2) NUMBITS(1) [],
        RCRDATA_STUFFING OFFSET(1) NUMBITS(1) [],
        GYDATA_STUFFING OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) FC_INVIDCONF [
        HDCP_KEEPOUT OFFSET(7) NUMBITS(1) [],
        VSYNC_IN_POLARITY OFFSET(6) NUMBITS(1) [],
        HSYNC_IN_POLARITY OFFSET(5) NUMBITS(1) [],
        DE_IN_POLARITY OFFSET(4) NUMBITS(1) [],
        DVI_MODEZ OFFSET(3) NUMBITS(1) [],
        R_V_BLANK_IN_OSC OFFSET(1) NUMBITS(1) [],
        IN_I_P OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) FC_AUDICONF0 [
        CC OFFSET(4) NUMBITS(3) [],
        CT OFFSET(0) NUMBITS(4) [],
    ],

    pub(crate) FC_AUDSCONF [
        AUD_PACKET_LAYOUT OFFSET(0) NUMBITS(1) [
            Layout0 = 0,
            Layout1 = 1,
        ],
    ],

    pub(crate) FC_SCRAMBLER_CTRL [
        SCRAMBLER_ON OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) FC_PACKET_TX_EN [
        DRM OFFSET(7) NUMBITS(1) [],
    ],

    pub(crate) AUD_CONF0 [
        SW_RESET OFFSET(7) NUMBITS(1) [],
        I2S_SELECT OFFSET(5) NUMBITS(1) [],
        I2S_IN_EN OFFSET(0) NUMBITS(4) [],
    ],

    pub(crate) AUD_CONF1 [
        I2S_MODE OFFSET(5) NUMBITS(3) [
            Standard = 0,
        ],
        I2S_WIDTH OFFSET(0) NUMBITS(5) [],
    ],

    pub(crate) AUD_N3 [
        NCTS_ATOMIC_WRITE OFFSET(7) NUMBITS(1) [],
        N OFFSET(0) NUMBITS(4) [],
    ],

    pub(crate) AUD_CTS3 [
        N_SHIFT OFFSET(5) NUMBITS(3) [],
        CTS_MANUAL OFFSET(4) NUMBITS(1) [],
        CTS OFFSET(0) NUMBITS(4) [],
    ],

    pub(crate) CONFIG0_ID [
        PREPEN OFFSET(7) NUMBITS(1) [],
        AUDSPDIF OFFSET(5) NUMBITS(1) [],
        AUDI2S OFFSET(4) NUMBITS(1) [],
        HDMI14 OFFSET(3) NUMBITS(1) [],
        CSC OFFSET(2) NUMBITS(1) [],
        CEC OFFSET(1) NUMBITS(1) [],
        HDCP OFFSET(0) NUMBITS(1) [],
    ],

    pub(crate) CONFIG3_ID [
        AHBAUDDMA OFFSET(1) NUMBITS(1) [],
        GPAUD OFFSET(0) NUMBITS(1) [],
    ],
];
