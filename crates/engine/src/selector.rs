//! Channel selection: the priority ladder and command table binding.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use microflash_probe::{EnvironmentFacts, TargetProfile};
use microflash_transport::{HidHookFn, PacketIoTransport, WinRtHidHooks};

use crate::channel::DeploymentChannel;
use crate::engine::{EngineConfig, EngineDeps};
use crate::events::EventSender;
use crate::extension::{self, AuxHooks, ExtensionOverride, OverrideStrategy};
use crate::strategies::browser::BrowserStrategy;
use crate::strategies::electron::ElectronStrategy;
use crate::strategies::local_server::LocalServerStrategy;
use crate::strategies::native_host::NativeHostStrategy;
use crate::strategies::packet::PacketStrategy;
use crate::strategies::winrt::WinRtStrategy;
use crate::strategy::{DeployStrategy, StrategyCtx};
use crate::table::{Selection, SlotSource, SlotSources};

/// Picks the deployment channel for a facts snapshot.
///
/// Pure priority ladder, first match wins; identical facts always yield
/// the same channel.
pub fn choose_channel(facts: &EnvironmentFacts) -> DeploymentChannel {
    if facts.force_download || facts.no_device_deploy {
        DeploymentChannel::BrowserOnly
    } else if facts.native_host_bridge {
        DeploymentChannel::NativeHost
    } else if facts.winrt {
        if facts.use_hf2 {
            DeploymentChannel::WinRtHf2
        } else {
            DeploymentChannel::WinRtCustom
        }
    } else if facts.electron {
        DeploymentChannel::Electron
    } else if facts.web_usb_usable() && facts.auto_web_usb_download {
        DeploymentChannel::WebUsbAuto
    } else if facts.web_usb_usable() && facts.paired_once {
        DeploymentChannel::WebUsbPaired
    } else if facts.hid_bridge_usable {
        DeploymentChannel::HidBridge
    } else if facts.local_server_usable() {
        DeploymentChannel::LocalServer
    } else {
        DeploymentChannel::BrowserOnly
    }
}

/// Builds the command table selection for a chosen channel.
///
/// Starts from browser defaults, rebinds the slots the channel defines,
/// picks the active packet transport, and applies extension overrides on
/// top. The WebUSB enable switch and the WinRT device watcher are flipped
/// here: selection is the side-effectful half of a pass, the probe stays
/// pure.
pub(crate) fn build_selection(
    channel: DeploymentChannel,
    deps: &EngineDeps,
    profile: &Arc<TargetProfile>,
    config: &EngineConfig,
    events: &EventSender,
    hooks: &Arc<RwLock<AuxHooks>>,
    facts: &EnvironmentFacts,
    overrides: Option<&ExtensionOverride>,
) -> Selection {
    deps.usb.set_enabled(facts.web_usb_enabled);

    let packet_io = active_packet_io(channel, deps, facts);
    let ctx = StrategyCtx {
        deps: deps.clone(),
        profile: profile.clone(),
        config: config.clone(),
        events: events.clone(),
        hooks: hooks.clone(),
        packet_io: packet_io.clone(),
    };
    let browser = BrowserStrategy::new(ctx.clone());
    let browser_defaults = SlotSources::browser_defaults();

    let (base_strategy, base_slots): (Arc<dyn DeployStrategy>, SlotSources) = match channel {
        DeploymentChannel::BrowserOnly => {
            debug!("deploy: browser only");
            (Arc::new(browser.clone()), browser_defaults)
        }
        DeploymentChannel::NativeHost => match &deps.native_host {
            Some(bridge) => {
                debug!("deploy: native host deploy/save");
                (
                    Arc::new(NativeHostStrategy::new(
                        ctx.clone(),
                        bridge.clone(),
                        browser.clone(),
                    )),
                    SlotSources {
                        deploy: SlotSource::NativeHost,
                        save: SlotSource::NativeHost,
                        ..browser_defaults
                    },
                )
            }
            None => {
                warn!("native host channel selected without a bridge, staying on browser");
                (Arc::new(browser.clone()), browser_defaults)
            }
        },
        DeploymentChannel::WinRtHf2 | DeploymentChannel::WinRtCustom => match &deps.winrt {
            Some(host) => {
                let hf2 = channel == DeploymentChannel::WinRtHf2;
                if hf2 {
                    debug!("deploy: winrt hf2");
                    host.init_hid(Some(winrt_watch_hooks(&packet_io)));
                } else {
                    debug!("deploy: winrt custom");
                    host.init_hid(None);
                }
                (
                    Arc::new(WinRtStrategy::new(
                        ctx.clone(),
                        host.clone(),
                        hf2,
                        browser.clone(),
                    )),
                    SlotSources {
                        deploy: SlotSource::WinRt,
                        save: SlotSource::WinRt,
                        download: SlotSource::WinRt,
                        ..browser_defaults
                    },
                )
            }
            None => {
                warn!("winrt channel selected without a host, staying on browser");
                (Arc::new(browser.clone()), browser_defaults)
            }
        },
        DeploymentChannel::Electron => match &deps.electron {
            Some(shell) => {
                debug!("deploy: electron");
                (
                    Arc::new(ElectronStrategy::new(shell.clone(), browser.clone())),
                    SlotSources {
                        deploy: SlotSource::Electron,
                        ..browser_defaults
                    },
                )
            }
            None => {
                warn!("electron channel selected without a shell, staying on browser");
                (Arc::new(browser.clone()), browser_defaults)
            }
        },
        DeploymentChannel::WebUsbAuto | DeploymentChannel::WebUsbPaired => {
            debug!(channel = %channel, "deploy: webusb");
            (
                Arc::new(PacketStrategy::new(ctx.clone(), browser.clone())),
                SlotSources {
                    deploy: SlotSource::WebUsb,
                    ..browser_defaults
                },
            )
        }
        DeploymentChannel::HidBridge => {
            debug!("deploy: hid bridge");
            (
                Arc::new(PacketStrategy::new(ctx.clone(), browser.clone())),
                SlotSources {
                    deploy: SlotSource::HidBridge,
                    ..browser_defaults
                },
            )
        }
        DeploymentChannel::LocalServer => match &deps.local_server {
            Some(server) => {
                debug!("deploy: localhost");
                (
                    Arc::new(LocalServerStrategy::new(
                        ctx.clone(),
                        server.clone(),
                        browser.clone(),
                    )),
                    SlotSources {
                        deploy: SlotSource::LocalServer,
                        ..browser_defaults
                    },
                )
            }
            None => {
                warn!("local server channel selected without a client, staying on browser");
                (Arc::new(browser.clone()), browser_defaults)
            }
        },
    };

    let (strategy, slots) = match overrides {
        Some(ovr) if ovr.overrides_commands() => {
            let mut slots = base_slots;
            extension::mark_slots(ovr, &mut slots);
            (
                OverrideStrategy::wrap(base_strategy.clone(), ovr.clone()),
                slots,
            )
        }
        _ => (base_strategy.clone(), base_slots),
    };

    debug!(
        channel = %channel,
        transport = packet_io.name(),
        "deploy commands bound"
    );

    Selection {
        channel,
        base_strategy,
        base_slots,
        strategy,
        slots,
        packet_io,
    }
}

/// The packet transport behind the chosen channel: WebUSB when switched
/// on, the HID bridge otherwise, with WinRT packet I/O taking over for
/// the HF2 split and raw-HID custom targets.
fn active_packet_io(
    channel: DeploymentChannel,
    deps: &EngineDeps,
    facts: &EnvironmentFacts,
) -> Arc<dyn PacketIoTransport> {
    let default = if facts.web_usb_enabled {
        deps.usb.clone()
    } else {
        deps.hid_bridge.clone()
    };
    match channel {
        DeploymentChannel::WinRtHf2 => deps.winrt_packet_io.clone().unwrap_or(default),
        DeploymentChannel::WinRtCustom if facts.raw_hid => {
            deps.winrt_packet_io.clone().unwrap_or(default)
        }
        _ => default,
    }
}

/// Device watcher hooks wiring WinRT arrival/removal back to packet I/O.
fn winrt_watch_hooks(packet_io: &Arc<dyn PacketIoTransport>) -> WinRtHidHooks {
    let arrived = {
        let transport = packet_io.clone();
        let hook: HidHookFn = Arc::new(move || {
            let transport = transport.clone();
            Box::pin(async move {
                if let Err(e) = transport.init().await {
                    warn!(error = %e, "winrt device arrival init failed");
                }
            })
        });
        hook
    };
    let removed = {
        let transport = packet_io.clone();
        let hook: HidHookFn = Arc::new(move || {
            let transport = transport.clone();
            Box::pin(async move {
                if let Err(e) = transport.disconnect().await {
                    warn!(error = %e, "winrt device removal disconnect failed");
                }
            })
        });
        hook
    };
    WinRtHidHooks {
        on_device_arrived: arrived,
        on_device_removed: removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> EnvironmentFacts {
        EnvironmentFacts::default()
    }

    #[test]
    fn defaults_to_browser_only() {
        assert_eq!(choose_channel(&facts()), DeploymentChannel::BrowserOnly);
    }

    #[test]
    fn force_download_beats_everything() {
        let f = EnvironmentFacts {
            force_download: true,
            native_host_bridge: true,
            winrt: true,
            electron: true,
            hid_bridge_usable: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::BrowserOnly);
    }

    #[test]
    fn no_device_deploy_forces_browser() {
        let f = EnvironmentFacts {
            no_device_deploy: true,
            native_host_bridge: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::BrowserOnly);
    }

    #[test]
    fn native_host_beats_lower_rules() {
        let f = EnvironmentFacts {
            native_host_bridge: true,
            winrt: true,
            electron: true,
            web_usb_available: true,
            web_usb_enabled: true,
            auto_web_usb_download: true,
            hid_bridge_usable: true,
            local_server_reachable: true,
            local_auth_token: Some("tok".into()),
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::NativeHost);
    }

    #[test]
    fn winrt_splits_on_hf2() {
        let f = EnvironmentFacts {
            winrt: true,
            use_hf2: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::WinRtHf2);

        let f = EnvironmentFacts {
            winrt: true,
            use_hf2: false,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::WinRtCustom);
    }

    #[test]
    fn electron_before_webusb() {
        let f = EnvironmentFacts {
            electron: true,
            web_usb_available: true,
            web_usb_enabled: true,
            auto_web_usb_download: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::Electron);
    }

    #[test]
    fn webusb_auto_download() {
        let f = EnvironmentFacts {
            web_usb_available: true,
            web_usb_enabled: true,
            auto_web_usb_download: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::WebUsbAuto);
    }

    #[test]
    fn webusb_paired_once() {
        let f = EnvironmentFacts {
            web_usb_available: true,
            web_usb_enabled: true,
            paired_once: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::WebUsbPaired);
    }

    #[test]
    fn webusb_without_pairing_falls_through() {
        let f = EnvironmentFacts {
            web_usb_available: true,
            web_usb_enabled: true,
            hid_bridge_usable: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::HidBridge);
    }

    #[test]
    fn local_server_needs_token() {
        let f = EnvironmentFacts {
            local_server_reachable: true,
            local_auth_token: Some("tok".into()),
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::LocalServer);

        let f = EnvironmentFacts {
            local_server_reachable: true,
            local_auth_token: None,
            ..facts()
        };
        assert_eq!(choose_channel(&f), DeploymentChannel::BrowserOnly);
    }

    #[test]
    fn selection_is_pure() {
        let f = EnvironmentFacts {
            winrt: true,
            use_hf2: true,
            ..facts()
        };
        assert_eq!(choose_channel(&f), choose_channel(&f));
    }
}
