//! Driver construction and adapter-pairing checks.

use labcomm::adapters::{Adapter, LoopbackAdapter};
use labcomm::drivers::{Driver, PowerSupplyDc, Sdm3055, ScpiInstrument, Tenma72_13360, Voltmeter};
use labcomm::CommError;

#[test]
fn compatible_pairings_construct() {
    let mut adapter = LoopbackAdapter::new();
    adapter.open().unwrap();
    assert!(ScpiInstrument::new(&mut adapter).is_ok());
    assert!(Sdm3055::new(&mut adapter).is_ok());
    assert!(Tenma72_13360::new(&mut adapter).is_ok());
}

#[cfg(feature = "adapter_serial")]
#[test]
fn sdm3055_rejects_serial_adapter() {
    use labcomm::adapters::SerialAdapter;

    let mut adapter = SerialAdapter::new("/dev/ttyUSB0", 9600);
    match Sdm3055::new(&mut adapter) {
        Err(CommError::Configuration(msg)) => {
            assert!(msg.contains("serial"));
        }
        other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
    }
}

#[cfg(feature = "adapter_serial")]
#[test]
fn scpi_instrument_accepts_serial_adapter() {
    use labcomm::adapters::SerialAdapter;

    // Construction only validates the pairing; no I/O happens until a
    // method is called, so no hardware is needed here.
    let mut adapter = SerialAdapter::new("/dev/ttyUSB0", 9600);
    assert!(ScpiInstrument::new(&mut adapter).is_ok());
}

#[test]
fn tenma_rejects_tcp_adapter() {
    use labcomm::adapters::TcpAdapter;

    let mut adapter = TcpAdapter::new("10.0.0.5:5025");
    assert!(matches!(
        Tenma72_13360::new(&mut adapter),
        Err(CommError::Configuration(_))
    ));
}

#[test]
fn multimeter_over_loopback_end_to_end() {
    let mut adapter = LoopbackAdapter::new().with_echo(false);
    adapter.stub_reply(
        b"*IDN?\n".to_vec(),
        b"Siglent Technologies,SDM3055,SDM35AB1234567,1.01.01.19\n".to_vec(),
    );
    adapter.stub_reply(b"FETC?\n".to_vec(), b"+4.99872000E+00\n".to_vec());
    adapter.open().unwrap();

    {
        let mut mm = Sdm3055::new(&mut adapter).unwrap();
        assert!(mm.test().unwrap());
        let volts = mm.measure_dc_voltage().unwrap();
        assert!((volts - 4.99872).abs() < 1e-9);
    }

    // The driver borrow has ended; the owner closes the adapter.
    adapter.close().unwrap();
}

#[test]
fn power_supply_over_loopback_end_to_end() {
    let mut adapter = LoopbackAdapter::new().with_echo(false);
    adapter.stub_reply(b"VSET?\n".to_vec(), b"5.00\n".to_vec());
    adapter.open().unwrap();

    let mut psu = Tenma72_13360::new(&mut adapter).unwrap();
    psu.set_voltage(5.0).unwrap();
    assert_eq!(psu.get_voltage().unwrap(), 5.0);
    assert!(psu.test().unwrap());
}

#[test]
fn driver_wraps_timeout_with_command_context() {
    // No FETC? stub: the fetch after configuration times out, and the
    // driver reports which command was in flight without discarding the
    // timeout underneath.
    let mut adapter = LoopbackAdapter::new().with_echo(false);
    adapter.open().unwrap();

    let mut mm = Sdm3055::new(&mut adapter).unwrap();
    let err = mm.measure_dc_voltage().unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("FETC?"));
}
