mod common;

use bme280_forced::{
    Calibration, HumidityCalibration, PressureCalibration, RawMeasurement,
    TemperatureCalibration, Variant,
};

/// Block where every byte is its own index plus an offset, so each field
/// has a distinct, hand-checkable value.
fn pattern_block() -> [u8; 26] {
    let mut block: [u8; 26] = [0; 26];
    for (n, byte) in block.iter_mut().enumerate() {
        *byte = 0x10 + n as u8;
    }
    block
}

#[test]
fn primary_block_offsets() {
    let block = pattern_block();
    let tail: [u8; 8] = [0; 8];
    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidityPressure);

    assert_eq!(
        *cal.temperature(),
        TemperatureCalibration {
            t1: 0x1110,
            t2: 0x1312,
            t3: 0x1514,
        }
    );
    assert_eq!(
        cal.pressure(),
        Some(&PressureCalibration {
            p1: 0x1716,
            p2: 0x1918,
            p3: 0x1B1A,
            p4: 0x1D1C,
            p5: 0x1F1E,
            p6: 0x2120,
            p7: 0x2322,
            p8: 0x2524,
            p9: 0x2726,
        })
    );
    // 0xA0 (block[24]) is not a coefficient
    assert_eq!(cal.humidity().h1, 0x29);
}

#[test]
fn signed_fields_are_twos_complement() {
    let mut block: [u8; 26] = [0; 26];
    block[0..2].copy_from_slice(&[0x18, 0xFC]);
    block[2..4].copy_from_slice(&[0x18, 0xFC]);
    block[22..24].copy_from_slice(&[0x00, 0x80]);
    let mut tail: [u8; 8] = [0; 8];
    tail[0..2].copy_from_slice(&[0xFF, 0xFF]);
    tail[6] = 0x9C;

    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidityPressure);
    assert_eq!(cal.temperature().t1, 0xFC18);
    assert_eq!(cal.temperature().t2, -1000);
    assert_eq!(cal.pressure().unwrap().p9, i16::MIN);
    assert_eq!(cal.humidity().h2, -1);
    assert_eq!(cal.humidity().h6, -100);
}

#[test]
fn humidity_tail_offsets() {
    let block = pattern_block();
    let tail: [u8; 8] = [0x6A, 0x01, 0x07, 0xAB, 0xCD, 0xEF, 0x1E, 0x55];
    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidity);

    assert_eq!(
        *cal.humidity(),
        HumidityCalibration {
            h1: 0x29,
            h2: 0x016A,
            h3: 0x07,
            // 0xE4 << 4 | 0xE5[3:0]
            h4: 0xABD,
            // 0xE6 << 4 | 0xE5[7:4]
            h5: 0xEFC,
            h6: 0x1E,
        }
    );
}

#[test]
fn nibble_packed_fields_are_independent() {
    let block: [u8; 26] = [0; 26];

    let mut tail: [u8; 8] = [0; 8];
    tail[4] = 0x0F;
    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidity);
    assert_eq!(cal.humidity().h4, 0x00F);
    assert_eq!(cal.humidity().h5, 0x000);

    tail[4] = 0xF0;
    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidity);
    assert_eq!(cal.humidity().h4, 0x000);
    assert_eq!(cal.humidity().h5, 0x00F);

    // full scale, no sign extension
    let tail: [u8; 8] = [0, 0, 0, 0xFF, 0xFF, 0xFF, 0, 0];
    let cal = Calibration::from_blocks(&block, &tail, Variant::TemperatureHumidity);
    assert_eq!(cal.humidity().h4, 0xFFF);
    assert_eq!(cal.humidity().h5, 0xFFF);
}

#[test]
fn datasheet_coefficients() {
    let cal = Calibration::from_blocks(
        &common::calibration_block(),
        &common::humidity_tail(),
        Variant::TemperatureHumidityPressure,
    );
    assert_eq!(cal.temperature().t1, common::T1);
    assert_eq!(cal.temperature().t2, common::T2);
    assert_eq!(cal.temperature().t3, common::T3);
    let p = cal.pressure().unwrap();
    assert_eq!(p.p1, common::P.0);
    assert_eq!([p.p2, p.p3, p.p4, p.p5, p.p6, p.p7, p.p8, p.p9], common::P.1);
    let h = cal.humidity();
    assert_eq!(h.h1, common::H1);
    assert_eq!(h.h2, common::H2);
    assert_eq!(h.h3, common::H3);
    assert_eq!(h.h4, common::H4);
    assert_eq!(h.h5, common::H5);
    assert_eq!(h.h6, common::H6);
}

#[test]
fn pressure_omitted_without_pressure_variant() {
    let cal = Calibration::from_blocks(
        &common::calibration_block(),
        &common::humidity_tail(),
        Variant::TemperatureHumidity,
    );
    assert!(cal.pressure().is_none());
    assert_eq!(cal.temperature().t1, common::T1);
}

/// Swapping the two bytes of a 16 bit field must change it unless the
/// bytes are equal, guards against an endianness flip.
#[test]
fn byte_order_matters() {
    let tail: [u8; 8] = [0; 8];
    let pairs: [(u8, u8); 5] = [(0x12, 0x34), (0x00, 0xFF), (0x80, 0x01), (0x5A, 0x5A), (0, 0)];
    let variant = Variant::TemperatureHumidityPressure;
    for field in 0..12 {
        for &(a, b) in pairs.iter() {
            let mut block: [u8; 26] = [0; 26];
            block[2 * field] = a;
            block[2 * field + 1] = b;
            let straight = Calibration::from_blocks(&block, &tail, variant);
            block[2 * field] = b;
            block[2 * field + 1] = a;
            let swapped = Calibration::from_blocks(&block, &tail, variant);
            assert_eq!(straight == swapped, a == b, "field {} bytes {:02X} {:02X}", field, a, b);
        }
    }

    let block: [u8; 26] = [0; 26];
    let variant = Variant::TemperatureHumidity;
    for &(a, b) in pairs.iter() {
        let straight_tail: [u8; 8] = [a, b, 0, 0, 0, 0, 0, 0];
        let swapped_tail: [u8; 8] = [b, a, 0, 0, 0, 0, 0, 0];
        let straight = Calibration::from_blocks(&block, &straight_tail, variant);
        let swapped = Calibration::from_blocks(&block, &swapped_tail, variant);
        assert_eq!(straight.humidity().h2 == swapped.humidity().h2, a == b);
    }
}

#[test]
fn measurement_decoding() {
    let raw = RawMeasurement::from(common::DATA);
    assert_eq!(raw.pressure, 415148);
    assert_eq!(raw.temperature, 519888);
    assert_eq!(raw.humidity, 27242);

    // low nibble of xlsb is discarded
    let raw = RawMeasurement::from([0xFF, 0xFF, 0xFF, 0x12, 0x34, 0x5F, 0xAB, 0xCD]);
    assert_eq!(raw.pressure, 0xFFFFF);
    assert_eq!(raw.temperature, 0x12345);
    assert_eq!(raw.humidity, 0xABCD);
}

#[test]
fn skipped_channels() {
    let raw = RawMeasurement::from([0x80, 0x00, 0x00, 0x80, 0x00, 0x00, 0x80, 0x00]);
    assert!(raw.pressure_skipped());
    assert!(raw.temperature_skipped());
    assert!(raw.humidity_skipped());

    let raw = RawMeasurement::from(common::DATA);
    assert!(!raw.pressure_skipped());
    assert!(!raw.temperature_skipped());
    assert!(!raw.humidity_skipped());
}
