use core::cell::{Cell, RefCell};

use dw_hdmi::codec::adau1372::{Adau1372I2c, Adau1372Probe, ADAU1372_MAX_REGISTER};
use dw_hdmi::i2c::{I2cClient, I2cDeviceId, I2cDriver, I2cRegistry, I2cRegmap};
use dw_hdmi::{Error, Regmap, Result};
use embedded_hal::blocking::i2c::{Write, WriteRead};

/// I2C bus with one 16 bit addressed device on it
#[derive(Default)]
struct BusState {
    regs: Vec<u8>,
    /// (slave address, bytes) of every write transfer
    writes: Vec<(u8, Vec<u8>)>,
    fail: bool,
}

impl BusState {
    fn new() -> Self {
        Self {
            regs: vec![0; 0x100],
            ..Self::default()
        }
    }
}

#[derive(Debug, PartialEq)]
struct Nak;

#[derive(Clone, Copy)]
struct SharedBus<'b>(&'b RefCell<BusState>);

impl Write for SharedBus<'_> {
    type Error = Nak;

    fn write(&mut self, address: u8, bytes: &[u8]) -> core::result::Result<(), Nak> {
        let mut bus = self.0.borrow_mut();
        if bus.fail {
            return Err(Nak);
        }
        bus.writes.push((address, bytes.to_vec()));
        if let [hi, lo, val] = *bytes {
            let reg = usize::from(u16::from_be_bytes([hi, lo]));
            bus.regs[reg] = val;
        }
        Ok(())
    }
}

impl WriteRead for SharedBus<'_> {
    type Error = Nak;

    fn write_read(&mut self, _address: u8, bytes: &[u8], buffer: &mut [u8]) -> core::result::Result<(), Nak> {
        let bus = self.0.borrow();
        if bus.fail {
            return Err(Nak);
        }
        let reg = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
        buffer[0] = bus.regs[reg];
        Ok(())
    }
}

/// Codec side that checks it can talk to the part
#[derive(Default)]
struct Codec {
    probed: Cell<u32>,
}

impl<'b> Adau1372Probe<SharedBus<'b>> for Codec {
    fn probe(&self, mut regmap: I2cRegmap<SharedBus<'b>>) -> Result<()> {
        if regmap.max_register() != ADAU1372_MAX_REGISTER {
            return Err(Error::InvalidArgs);
        }
        regmap.write(0x0000, 0x81)?;
        if regmap.read(0x0000)? != 0x81 {
            return Err(Error::NoDevice);
        }
        self.probed.set(self.probed.get() + 1);
        Ok(())
    }
}

const OTHER_IDS: &[I2cDeviceId] = &[I2cDeviceId {
    name: "other",
    driver_data: 7,
}];

struct Other;

impl<B> I2cDriver<B> for Other {
    fn name(&self) -> &'static str {
        "other"
    }

    fn id_table(&self) -> &'static [I2cDeviceId] {
        OTHER_IDS
    }

    fn probe(&self, _client: I2cClient<B>, _id: Option<&I2cDeviceId>) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _addr: u8) -> Result<()> {
        Ok(())
    }
}

fn client<'b>(bus: &'b RefCell<BusState>, name: &'static str, compatible: Option<&'static str>) -> I2cClient<SharedBus<'b>> {
    I2cClient {
        bus: SharedBus(bus),
        addr: 0x3c,
        name,
        compatible,
    }
}

#[test]
fn register_and_unregister() {
    let drv = Adau1372I2c::new(Codec::default());
    let other = Other;
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 2> = I2cRegistry::new();
    assert!(registry.is_empty());

    registry.register(&drv).unwrap();
    assert_eq!(registry.register(&drv), Err(Error::InvalidArgs));
    registry.register(&other).unwrap();
    assert_eq!(registry.len(), 2);

    registry.unregister("adau1372").unwrap();
    assert_eq!(registry.unregister("adau1372"), Err(Error::NoDevice));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_capacity() {
    let drv = Adau1372I2c::new(Codec::default());
    let other = Other;
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 1> = I2cRegistry::new();
    registry.register(&drv).unwrap();
    assert_eq!(registry.register(&other), Err(Error::InvalidArgs));
    registry.unregister("adau1372").unwrap();
    registry.register(&other).unwrap();
}

#[test]
fn match_by_compatible_then_name() {
    let drv = Adau1372I2c::new(Codec::default());
    let other = Other;
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 4> = I2cRegistry::default();
    registry.register(&other).unwrap();
    registry.register(&drv).unwrap();

    let (found, id) = registry.match_device("codec", Some("adi,adau1372")).unwrap();
    assert_eq!(found.name(), "adau1372");
    assert!(id.is_none());

    let (found, id) = registry.match_device("other", None).unwrap();
    assert_eq!(found.name(), "other");
    assert_eq!(id.unwrap().driver_data, 7);

    // unknown compatible falls back to the id tables
    let (found, id) = registry.match_device("adau1372", Some("vendor,unknown")).unwrap();
    assert_eq!(found.name(), "adau1372");
    assert_eq!(id.unwrap().name, "adau1372");

    assert!(registry.match_device("nothing", None).is_none());
}

#[test]
fn probe_hands_a_regmap_to_the_codec() {
    let bus = RefCell::new(BusState::new());
    let drv = Adau1372I2c::new(Codec::default());
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 2> = I2cRegistry::new();
    registry.register(&drv).unwrap();

    let bound = registry.probe(client(&bus, "adau1372", Some("adi,adau1372"))).unwrap();
    assert_eq!(bound.name(), "adau1372");
    assert_eq!(bound.remove(0x3c), Ok(()));

    let state = bus.borrow();
    // 16 bit register address, big endian
    assert_eq!(state.writes, [(0x3c, vec![0x00, 0x00, 0x81])]);
}

#[test]
fn probe_without_driver() {
    let bus = RefCell::new(BusState::new());
    let drv = Adau1372I2c::new(Codec::default());
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 2> = I2cRegistry::new();
    registry.register(&drv).unwrap();

    let res = registry.probe(client(&bus, "adau1761", None));
    assert!(matches!(res, Err(Error::NoDevice)));
    assert!(bus.borrow().writes.is_empty());
}

#[test]
fn probe_reports_bus_failure() {
    let bus = RefCell::new(BusState::new());
    bus.borrow_mut().fail = true;
    let codec = Codec::default();
    let drv = Adau1372I2c::new(codec);
    let mut registry: I2cRegistry<'_, SharedBus<'_>, 2> = I2cRegistry::new();
    registry.register(&drv).unwrap();

    let res = registry.probe(client(&bus, "adau1372", None));
    assert!(matches!(res, Err(Error::Bus { reg: 0 })));
}

#[test]
fn regmap_bounds_and_update_bits() {
    let bus = RefCell::new(BusState::new());
    let mut map = I2cRegmap::new(SharedBus(&bus), 0x3c, ADAU1372_MAX_REGISTER);

    assert_eq!(map.write(0x006c, 0x01), Err(Error::InvalidArgs));
    assert_eq!(map.read(0x1_0000), Err(Error::InvalidArgs));
    map.write(0x006b, 0x5a).unwrap();
    assert_eq!(map.read(0x006b), Ok(0x5a));

    map.update_bits(0x0012, 0x0f, 0x03).unwrap();
    assert_eq!(map.read(0x0012), Ok(0x03));
    // unchanged value is not written again
    map.update_bits(0x0012, 0x0f, 0x03).unwrap();
    assert_eq!(bus.borrow().writes.len(), 2);
    assert_eq!(bus.borrow().writes[1], (0x3c, vec![0x00, 0x12, 0x03]));

    bus.borrow_mut().fail = true;
    assert_eq!(map.read(0x0001), Err(Error::Bus { reg: 0x0001 }));
    let SharedBus(state) = map.release();
    assert!(state.borrow().fail);
}
