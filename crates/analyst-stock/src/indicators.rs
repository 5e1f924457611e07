//! Technical indicator computation engine
//!
//! Pure, stateless functions over a close-price series. Each function has a
//! defined degenerate result when the series is too short for its full
//! formula; callers rely on those fallbacks instead of handling errors. All
//! results are deterministic f64 arithmetic.

/// Relative Strength Index over the trailing `period`
///
/// Fewer than `period + 1` points returns the neutral 50.0. An average loss
/// of exactly zero returns 100.0 (no division by zero on an unbroken
/// uptrend).
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if prices.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).collect();
    let losses: Vec<f64> = deltas.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).collect();

    let avg_gain = mean(&gains[gains.len() - period..]);
    let avg_loss = mean(&losses[losses.len() - period..]);

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Exponential Moving Average with smoothing factor `2 / (period + 1)`
///
/// Seeded with the arithmetic mean of the first `period` values; a series
/// shorter than `period` falls back to the mean of the whole series.
pub fn ema(prices: &[f64], period: usize) -> f64 {
    if prices.len() < period {
        return mean(prices);
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut value = mean(&prices[..period]);

    for &price in &prices[period..] {
        value = price * multiplier + value * (1.0 - multiplier);
    }

    value
}

/// MACD line and its signal, as `(macd, signal)`
///
/// Fewer than 26 points returns the (0.0, 0.0) not-enough-history sentinel.
/// The signal is the 9-period EMA of the single-element MACD series, which
/// reduces to the EMA's mean fallback: the signal always equals the MACD
/// value. That degenerate behavior is contractual and preserved as is.
pub fn macd(prices: &[f64]) -> (f64, f64) {
    if prices.len() < 26 {
        return (0.0, 0.0);
    }

    let macd_line = ema(prices, 12) - ema(prices, 26);
    let signal = ema(&[macd_line], 9);

    (macd_line, signal)
}

/// Simple Moving Average of the last `window` points
///
/// A series shorter than `window` averages the whole series instead.
pub fn sma(prices: &[f64], window: usize) -> f64 {
    if prices.len() < window {
        return mean(prices);
    }
    mean(&prices[prices.len() - window..])
}

/// Bollinger Bands as `(upper, lower)`
///
/// `sma ± k·σ` over the last `period` points with population standard
/// deviation. A series shorter than `period` collapses both bands to the
/// whole-series mean.
pub fn bollinger(prices: &[f64], period: usize, k: f64) -> (f64, f64) {
    if prices.len() < period {
        let m = mean(prices);
        return (m, m);
    }

    let tail = &prices[prices.len() - period..];
    let m = mean(tail);
    let sd = stddev_population(tail);

    (m + k * sd, m - k * sd)
}

/// Successive daily returns: `close[i] / close[i-1] - 1`
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized volatility: sample stddev of daily returns scaled by sqrt(252)
///
/// Fewer than two returns yields 0.0.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    stddev_sample(returns) * (252.0_f64).sqrt()
}

/// Maximum drawdown over a return series
///
/// Cumulative product of `(1 + r)` against its running peak; the result is
/// the most negative pointwise `cum / peak - 1` observed, always in
/// `[-1, 0]`. An empty series yields 0.0.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = 1.0;
    let mut worst = 0.0_f64;

    for &r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = cumulative / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn stddev_population(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn stddev_sample(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    variance.sqrt()
}
