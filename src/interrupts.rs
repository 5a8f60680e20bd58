use lazy_static::lazy_static;
use log::{error, info, warn};
use pic8259::ChainedPics;
use spin::Mutex;
use x86_64::instructions::hlt;
use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

use lightsout::constants::interrupts::{
    PIC_1_DATA_PORT, PIC_1_MASK, PIC_1_OFFSET, PIC_2_DATA_PORT, PIC_2_MASK, PIC_2_OFFSET,
};
use lightsout::constants::keyboard::DATA_PORT;
use lightsout::constants::timer::{CHANNEL0_PORT, DIVISOR, MODE_PORT, SQUARE_WAVE, TICKS_PER_SECOND};

/// Hardware interrupt numbers (after remapping)
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,
    Keyboard,
}

impl InterruptIndex {
    fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Programmable Interrupt Controller (PIC) setup
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

lazy_static! {
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();

        // CPU exceptions
        idt.breakpoint.set_handler_fn(breakpoint_handler);
        idt.double_fault.set_handler_fn(double_fault_handler);
        idt.page_fault.set_handler_fn(page_fault_handler);
        idt.general_protection_fault.set_handler_fn(general_protection_fault_handler);

        // Every PIC line gets a handler so a stray IRQ cannot triple fault
        for vector in PIC_1_OFFSET..PIC_2_OFFSET + 8 {
            idt[vector].set_handler_fn(spurious_interrupt_handler);
        }
        idt[InterruptIndex::Timer.as_u8()].set_handler_fn(timer_interrupt_handler);
        idt[InterruptIndex::Keyboard.as_u8()].set_handler_fn(keyboard_interrupt_handler);

        idt
    };
}

/// Load the IDT, remap the PICs, start the timer and enable interrupts.
pub fn init() {
    IDT.load();
    info!("interrupts: IDT loaded");

    unsafe {
        PICS.lock().initialize();
        Port::<u8>::new(PIC_1_DATA_PORT).write(PIC_1_MASK);
        Port::<u8>::new(PIC_2_DATA_PORT).write(PIC_2_MASK);
    }
    info!("interrupts: PICs remapped to {}/{}, timer and keyboard unmasked", PIC_1_OFFSET, PIC_2_OFFSET);

    init_timer();

    x86_64::instructions::interrupts::enable();
}

/// Channel 0 as a square wave at `TICKS_PER_SECOND`.
fn init_timer() {
    unsafe {
        Port::<u8>::new(MODE_PORT).write(SQUARE_WAVE);
        let mut channel0 = Port::<u8>::new(CHANNEL0_PORT);
        channel0.write((DIVISOR & 0xFF) as u8);
        channel0.write((DIVISOR >> 8) as u8);
    }
    info!("interrupts: PIT at {} Hz (divisor {})", TICKS_PER_SECOND, DIVISOR);
}

// Exception handlers
extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    warn!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    _error_code: u64,
) -> ! {
    error!("EXCEPTION: DOUBLE FAULT - halting\n{:#?}", stack_frame);
    loop {
        hlt();
    }
}

extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    error!("EXCEPTION: PAGE FAULT");
    error!("Accessed Address: {:?}", Cr2::read());
    error!("Error Code: {:?}", error_code);
    error!("{:#?}", stack_frame);
    loop {
        hlt();
    }
}

extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    error!("EXCEPTION: GENERAL PROTECTION FAULT");
    error!("Error Code: {}", error_code);
    error!("{:#?}", stack_frame);
    loop {
        hlt();
    }
}

// Hardware interrupt handlers
extern "x86-interrupt" fn timer_interrupt_handler(_stack_frame: InterruptStackFrame) {
    crate::TICKS.tick();

    unsafe {
        PICS.lock()
            .notify_end_of_interrupt(InterruptIndex::Timer.as_u8());
    }
}

extern "x86-interrupt" fn keyboard_interrupt_handler(_stack_frame: InterruptStackFrame) {
    let mut port = Port::new(DATA_PORT);
    let scancode: u8 = unsafe { port.read() };

    crate::INPUT.enqueue(scancode);

    unsafe {
        PICS.lock()
            .notify_end_of_interrupt(InterruptIndex::Keyboard.as_u8());
    }
}

extern "x86-interrupt" fn spurious_interrupt_handler(_stack_frame: InterruptStackFrame) {
    // We don't know which line fired, so acknowledge both PICs
    unsafe {
        PICS.lock().notify_end_of_interrupt(PIC_2_OFFSET);
    }
}
