use anyhow::{Context, Result};
use board::adapters::AdapterRole;
use board::adc::{self, ADC_PIN_MAP};
use board::capacity::PeripheralClass;
use board::clock_config::ClockTree;
use board::irq::{IrqClass, IrqPriority, RTOS_MAX_SYSCALL_PRIORITY};
use board::resources::{DMA_ALLOCATION, TIMER_ALLOCATION};
use board::watchdog::{WatchdogFlags, WATCHDOG_TIMEOUT_MS};
use board::{config, receiver, usart};
use colored::Colorize;
use serde_json::{json, Value};

pub fn run(as_json: bool) -> Result<()> {
    if as_json {
        let text =
            serde_json::to_string_pretty(&to_json()).context("Failed to serialise manifest")?;
        println!("{text}");
    } else {
        print_text();
    }
    Ok(())
}

fn role_target(role: AdapterRole) -> String {
    match role.target() {
        board::adapters::RoleTarget::Adapter(adapter) => adapter.name().to_string(),
        board::adapters::RoleTarget::Alias(other) => format!("-> {}", other.name()),
    }
}

fn to_json() -> Value {
    let clocks = ClockTree::board();
    json!({
        "board": config::BOARD_NAME,
        "revision": config::BOARD_REVISION,
        "version": config::BOARD_VERSION,
        "capacity": PeripheralClass::ALL
            .iter()
            .map(|c| (c.name().to_string(), json!(c.max_instances())))
            .collect::<serde_json::Map<_, _>>(),
        "clocks": {
            "sysclk_hz": clocks.sysclk_hz,
            "pclk1_hz": clocks.pclk1_hz,
            "pclk2_hz": clocks.pclk2_hz,
            "apb1_hz": clocks.apb1_hz,
            "apb2_hz": clocks.apb2_hz,
        },
        "irq": {
            "rtos_max_syscall": RTOS_MAX_SYSCALL_PRIORITY,
            "bands": IrqPriority::ALL
                .iter()
                .map(|p| json!({ "band": format!("{p:?}"), "value": p.value() }))
                .collect::<Vec<_>>(),
            "classes": IrqClass::ALL
                .iter()
                .map(|c| json!({ "class": format!("{c:?}"), "priority": c.priority().value() }))
                .collect::<Vec<_>>(),
        },
        "adapters": AdapterRole::ALL
            .iter()
            .map(|r| json!({
                "role": r.name(),
                "target": role_target(*r),
                "physical": r.physical().name(),
            }))
            .collect::<Vec<_>>(),
        "watchdog": {
            "timeout_ms": WATCHDOG_TIMEOUT_MS,
            "all": WatchdogFlags::ALL.bits(),
            "clients": WatchdogFlags::CLIENTS
                .iter()
                .map(|(name, flag)| json!({ "name": name, "bit": flag.bits() }))
                .collect::<Vec<_>>(),
        },
        "adc": ADC_PIN_MAP
            .iter()
            .enumerate()
            .map(|(i, e)| json!({
                "index": i,
                "pin": e.gpio_pin().map(|p| p.to_string()),
                "channel": e.channel.number(),
                "oversample": e.oversample,
            }))
            .collect::<Vec<_>>(),
        "receivers": receiver::ReceiverProtocol::ALL
            .iter()
            .map(|p| json!({
                "protocol": p.name(),
                "max_devices": p.max_devices(),
                "inputs": p.num_inputs(),
            }))
            .collect::<Vec<_>>(),
        "sbus_inverter": {
            "usart": usart::SBUS_INVERTER.port.name(),
            "pin": usart::SBUS_INVERTER.pin.to_string(),
        },
        "timers": TIMER_ALLOCATION
            .iter()
            .map(|t| json!({ "timer": t.timer, "channels": t.channels, "owner": t.owner.name() }))
            .collect::<Vec<_>>(),
        "dma": DMA_ALLOCATION
            .iter()
            .map(|d| json!({ "channel": d.channel, "owner": d.owner.name() }))
            .collect::<Vec<_>>(),
    })
}

fn heading(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

fn print_text() {
    println!(
        "{} {} (rev {}, crate {})",
        "Board".bold(),
        config::BOARD_NAME.green().bold(),
        config::BOARD_REVISION,
        config::BOARD_VERSION
    );

    heading("Capacity");
    for class in PeripheralClass::ALL {
        println!("  {:<10} {}", class.name(), class.max_instances());
    }

    heading("Clocks");
    let clocks = ClockTree::board();
    println!("  SYSCLK     {:>11} Hz", clocks.sysclk_hz);
    println!("  PCLK1      {:>11} Hz", clocks.pclk1_hz);
    println!("  PCLK2      {:>11} Hz", clocks.pclk2_hz);
    println!("  APB1 TIM   {:>11} Hz", clocks.apb1_hz);
    println!("  APB2 TIM   {:>11} Hz", clocks.apb2_hz);

    heading("Interrupt priorities");
    for class in IrqClass::ALL {
        let band = class.priority();
        let rtos = if band.is_above_rtos() {
            "above RTOS".yellow()
        } else {
            "below RTOS".dimmed()
        };
        println!("  {:<10} {:>2} {:?} ({rtos})", format!("{class:?}"), band.value(), band);
    }
    println!("  RTOS max syscall priority: {RTOS_MAX_SYSCALL_PRIORITY}");

    heading("Adapter roles");
    for role in AdapterRole::ALL {
        println!(
            "  {:<18} {:<18} => {}",
            role.name(),
            role_target(role),
            role.physical().name().green()
        );
    }

    heading("Watchdog");
    println!("  timeout {WATCHDOG_TIMEOUT_MS} ms, clients {}", WatchdogFlags::ALL);

    heading("ADC scan sequence");
    for slot in adc::scan_sequence() {
        let pin = ADC_PIN_MAP
            .get(slot.index)
            .and_then(|e| e.gpio_pin())
            .map_or_else(|| "internal".dimmed().to_string(), |p| p.to_string());
        println!("  rank {} index {} channel {:>2} {pin}", slot.rank, slot.index, slot.channel.number());
    }

    heading("Receivers");
    for proto in receiver::ReceiverProtocol::ALL {
        println!(
            "  {:<9} max {} inputs {:>2} usable {:>2}",
            proto.name(),
            proto.max_devices(),
            proto.num_inputs(),
            proto.usable_channels()
        );
    }
    println!(
        "  S.Bus inverter on {} pin {}",
        usart::SBUS_INVERTER.port,
        usart::SBUS_INVERTER.pin
    );

    heading("Timers / DMA");
    for t in TIMER_ALLOCATION {
        println!("  TIM{} channels {:#06b} {}", t.timer, t.channels, t.owner);
    }
    for d in DMA_ALLOCATION {
        println!("  DMA channel {:>2} {}", d.channel, d.owner);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_has_every_section() {
        let v = to_json();
        for key in [
            "capacity", "clocks", "irq", "adapters", "watchdog", "adc", "receivers", "timers", "dma",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["clocks"]["apb1_hz"], 84_000_000);
        assert_eq!(v["clocks"]["pclk1_hz"], 42_000_000);
        assert_eq!(v["watchdog"]["all"], 0x3F);
        assert_eq!(v["capacity"]["USART"], 5);
    }

    #[test]
    fn etasv3_shown_as_alias() {
        assert_eq!(role_target(AdapterRole::Etasv3), "-> FLEXI");
        assert_eq!(role_target(AdapterRole::Mpu6000), "spi_gyro");
    }
}
