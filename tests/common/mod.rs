#![allow(dead_code)]

use bme280_forced::Transport;

/// Datasheet worked example, temperature and pressure coefficients.
pub const T1: u16 = 27504;
pub const T2: i16 = 26435;
pub const T3: i16 = -1000;
pub const P: (u16, [i16; 8]) = (36477, [-10685, 3024, 2855, 140, -7, 15500, -14600, 6000]);
/// Typical humidity coefficients from a production part.
pub const H1: u8 = 75;
pub const H2: i16 = 362;
pub const H3: u8 = 0;
pub const H4: i16 = 313;
pub const H5: i16 = 50;
pub const H6: i8 = 30;

/// `adc_P = 415148`, `adc_T = 519888`, `adc_H = 27242`.
pub const DATA: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x6A, 0x6A];

pub fn calibration_block() -> [u8; 26] {
    let mut block: [u8; 26] = [0; 26];
    block[0..2].copy_from_slice(&T1.to_le_bytes());
    block[2..4].copy_from_slice(&T2.to_le_bytes());
    block[4..6].copy_from_slice(&T3.to_le_bytes());
    block[6..8].copy_from_slice(&P.0.to_le_bytes());
    for (n, p) in P.1.iter().enumerate() {
        block[8 + 2 * n..10 + 2 * n].copy_from_slice(&p.to_le_bytes());
    }
    block[24] = 0x00;
    block[25] = H1;
    block
}

pub fn humidity_tail() -> [u8; 8] {
    let mut tail: [u8; 8] = [0; 8];
    tail[0..2].copy_from_slice(&H2.to_le_bytes());
    tail[2] = H3;
    tail[3] = (H4 >> 4) as u8;
    tail[4] = ((H5 as u8 & 0x0F) << 4) | (H4 as u8 & 0x0F);
    tail[5] = (H5 >> 4) as u8;
    tail[6] = H6 as u8;
    tail[7] = 0xEE;
    tail
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BusFault;

/// Register level model of a BME280 on a 4-wire SPI bus.
///
/// Within a frame the first byte is a control byte.  With bit 7 set the
/// device streams registers from that address with auto-increment, with
/// bit 7 clear the next byte is written to the register and the byte after
/// that is a control byte again.
pub struct FakeBme280 {
    pub regs: [u8; 256],
    /// MOSI bytes of every completed frame.
    pub frames: Vec<Vec<u8>>,
    /// Register writes in bus order, 8-bit register addresses.
    pub writes: Vec<(u8, u8)>,
    /// Fail the transfer with this index (counted over the whole session).
    pub fail_transfer: Option<usize>,
    /// Chip ID values to serve on successive ID reads before `regs[0xD0]`.
    pub id_sequence: Vec<u8>,
    transfers: usize,
    selected: bool,
    current: Vec<u8>,
    read_ptr: Option<u8>,
    write_addr: Option<u8>,
}

impl FakeBme280 {
    pub fn new() -> Self {
        let mut regs: [u8; 256] = [0; 256];
        regs[0xD0] = 0x60;
        regs[0x88..0x88 + 26].copy_from_slice(&calibration_block());
        regs[0xE1..0xE1 + 8].copy_from_slice(&humidity_tail());
        regs[0xF7..0xF7 + 8].copy_from_slice(&DATA);
        FakeBme280 {
            regs,
            frames: Vec::new(),
            writes: Vec::new(),
            fail_transfer: None,
            id_sequence: Vec::new(),
            transfers: 0,
            selected: false,
            current: Vec::new(),
            read_ptr: None,
            write_addr: None,
        }
    }

    pub fn with_chip_id(mut self, id: u8) -> Self {
        self.regs[0xD0] = id;
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn read_reg(&mut self, addr: u8) -> u8 {
        if addr == 0xD0 && !self.id_sequence.is_empty() {
            self.id_sequence.remove(0)
        } else {
            self.regs[usize::from(addr)]
        }
    }
}

impl Transport for FakeBme280 {
    type Error = BusFault;

    fn begin(&mut self) -> Result<(), BusFault> {
        assert!(!self.selected, "chip select asserted twice");
        self.selected = true;
        self.current.clear();
        self.read_ptr = None;
        self.write_addr = None;
        Ok(())
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, BusFault> {
        assert!(self.selected, "transfer outside of a frame");
        let index: usize = self.transfers;
        self.transfers += 1;
        if self.fail_transfer == Some(index) {
            return Err(BusFault);
        }
        self.current.push(byte);

        if let Some(addr) = self.read_ptr {
            let value: u8 = self.read_reg(addr);
            self.read_ptr = Some(addr.wrapping_add(1));
            return Ok(value);
        }
        if let Some(addr) = self.write_addr.take() {
            self.regs[usize::from(addr)] = byte;
            self.writes.push((addr, byte));
            return Ok(0xFF);
        }
        if byte & 0x80 != 0 {
            self.read_ptr = Some(byte);
        } else {
            self.write_addr = Some(byte | 0x80);
        }
        Ok(0xFF)
    }

    fn end(&mut self) -> Result<(), BusFault> {
        assert!(self.selected, "chip select released twice");
        self.selected = false;
        self.frames.push(core::mem::take(&mut self.current));
        Ok(())
    }
}
