use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use tokio::sync::mpsc;

use crate::models::BatteryInfo;

/// Anything that can report battery level and state. Platform bindings live
/// behind this; the dial loop does not care which one is wired in.
pub trait BatterySource: Send {
    /// Latest known reading, used to prime the gauge.
    fn current(&self) -> Result<BatteryInfo>;

    /// Change notifications. The loop keeps running if the channel closes.
    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<BatteryInfo>>;
}

/// A battery that never changes, e.g. for screenshots or machines without one.
#[derive(Debug, Clone, Copy)]
pub struct FixedBattery {
    info: BatteryInfo,
}

impl FixedBattery {
    pub fn new(info: BatteryInfo) -> Self {
        Self { info }
    }
}

impl Default for FixedBattery {
    fn default() -> Self {
        Self::new(BatteryInfo::unknown())
    }
}

impl BatterySource for FixedBattery {
    fn current(&self) -> Result<BatteryInfo> {
        Ok(self.info)
    }

    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<BatteryInfo>> {
        // Sender dropped right away: nothing will ever arrive.
        let (_tx, rx) = mpsc::unbounded_channel();
        Ok(rx)
    }
}

/// Notification-driven source. Platform glue holds the `BatteryNotifier` and
/// calls `notify` whenever the OS reports a change.
pub struct ChannelBattery {
    latest: Arc<Mutex<BatteryInfo>>,
    receiver: Option<mpsc::UnboundedReceiver<BatteryInfo>>,
}

#[derive(Clone)]
pub struct BatteryNotifier {
    latest: Arc<Mutex<BatteryInfo>>,
    sender: mpsc::UnboundedSender<BatteryInfo>,
}

impl ChannelBattery {
    pub fn new(initial: BatteryInfo) -> (Self, BatteryNotifier) {
        let latest = Arc::new(Mutex::new(initial));
        let (sender, receiver) = mpsc::unbounded_channel();

        (
            Self {
                latest: latest.clone(),
                receiver: Some(receiver),
            },
            BatteryNotifier { latest, sender },
        )
    }
}

impl BatterySource for ChannelBattery {
    fn current(&self) -> Result<BatteryInfo> {
        self.latest
            .lock()
            .map(|guard| *guard)
            .map_err(|_| anyhow!("battery reading lock poisoned"))
    }

    fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<BatteryInfo>> {
        match self.receiver.take() {
            Some(receiver) => Ok(receiver),
            None => bail!("battery source already subscribed"),
        }
    }
}

impl BatteryNotifier {
    pub fn notify(&self, info: BatteryInfo) -> Result<()> {
        let info = BatteryInfo::new(info.level, info.state);
        match self.latest.lock() {
            Ok(mut guard) => *guard = info,
            Err(poisoned) => *poisoned.into_inner() = info,
        }
        self.sender
            .send(info)
            .map_err(|_| anyhow!("battery subscriber has gone away"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatteryState;

    #[test]
    fn fixed_battery_reports_and_stays_quiet() {
        let info = BatteryInfo::new(1.0, BatteryState::Full);
        let mut source = FixedBattery::new(info);
        assert_eq!(source.current().unwrap(), info);

        let mut rx = source.subscribe().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn channel_battery_forwards_notifications() {
        let (mut source, notifier) = ChannelBattery::new(BatteryInfo::unknown());
        let mut rx = source.subscribe().unwrap();

        notifier
            .notify(BatteryInfo::new(0.42, BatteryState::Charging))
            .unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received.level, 0.42);
        assert_eq!(received.state, BatteryState::Charging);
        assert_eq!(source.current().unwrap(), received);
    }

    #[test]
    fn channel_battery_subscribes_once() {
        let (mut source, _notifier) = ChannelBattery::new(BatteryInfo::unknown());
        assert!(source.subscribe().is_ok());
        assert!(source.subscribe().is_err());
    }

    #[test]
    fn notify_fails_after_subscriber_drops() {
        let (mut source, notifier) = ChannelBattery::new(BatteryInfo::unknown());
        drop(source.subscribe().unwrap());
        assert!(notifier
            .notify(BatteryInfo::new(0.3, BatteryState::Unplugged))
            .is_err());
    }
}
