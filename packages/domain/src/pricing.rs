//! # 送料のマークアップ計算
//!
//! キャリアの見積額（GST 18% 込み）に固定のマークアップを乗せ、
//! 顧客向けの送料と内訳（運賃・代引き手数料・課税対象額・GST）を算出する。
//!
//! ## 計算手順
//!
//! 1. 販売価格 = キャリア見積額 × 1.28
//! 2. 課税対象額 = 販売価格 ÷ 1.18
//! 3. GST = 販売価格 − 課税対象額
//! 4. 代引き手数料 = max(40, 代引き金額 × 1.5%) × 1.28（代引き時のみ）
//! 5. 運賃 = 課税対象額 − 代引き手数料
//!
//! 運賃が負になる場合は代引き手数料を 0 にし、課税対象額をすべて運賃とする。
//!
//! ## 使用例
//!
//! ```rust
//! use shipquote_domain::{CodAmount, PaymentMode, RateBreakdown};
//!
//! let breakdown = RateBreakdown::calculate(100.0, PaymentMode::Prepaid, CodAmount::zero());
//! let formatted = breakdown.formatted();
//!
//! assert_eq!(formatted.rate, "128.00");
//! assert_eq!(formatted.taxable_amount, "108.47");
//! assert_eq!(formatted.gst, "19.53");
//! ```

use serde::Serialize;
use strum::IntoStaticStr;

/// マークアップ率（28%）
pub const MARKUP_FACTOR: f64 = 1.28;
/// GST 率（18%）
pub const GST_FACTOR: f64 = 1.18;
/// 代引き手数料の最低額
pub const COD_MIN_FEE: f64 = 40.0;
/// 代引き手数料の料率（代引き金額に対する割合）
pub const COD_FEE_RATE: f64 = 0.015;

// =========================================================================
// PaymentMode（支払方法）
// =========================================================================

/// 支払方法
///
/// `Display` / `Into<&'static str>` はキャリア API に渡すコード
/// （`pt` パラメータ）を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
pub enum PaymentMode {
    /// 前払い
    #[strum(serialize = "Pre-paid")]
    Prepaid,
    /// 代金引換
    #[strum(serialize = "COD")]
    Cod,
}

impl PaymentMode {
    /// リクエストの `paymentMode` から支払方法を決定する
    ///
    /// `"Prepaid"` のみ前払いとし、それ以外（未指定を含む）は代引きとする。
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some("Prepaid") => Self::Prepaid,
            _ => Self::Cod,
        }
    }

    /// キャリア API 用の支払コード
    pub fn carrier_code(self) -> &'static str {
        self.into()
    }
}

// =========================================================================
// CodAmount（代引き金額）
// =========================================================================

/// 代引き金額
///
/// 数値として解釈できない入力は 0 として扱う（エラーにはしない）。
/// 常に有限値を保持する。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CodAmount(f64);

impl CodAmount {
    /// 0 円
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// 数値から作成する（非有限値は 0）
    pub fn new(value: f64) -> Self {
        if value.is_finite() { Self(value) } else { Self::zero() }
    }

    /// 文字列を寛容に解釈する
    ///
    /// 先頭の空白を除いた最長の 10 進数接頭辞を使う（`"1500abc"` → 1500）。
    /// 接頭辞がない場合は 0。
    pub fn parse_lenient(input: &str) -> Self {
        parse_leading_decimal(input).map_or_else(Self::zero, Self::new)
    }

    /// 内部の値を取得する
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for CodAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 文字列先頭の 10 進数表記を数値に変換する
///
/// 符号・小数点・指数を含む最長の接頭辞を対象とする。
/// 仮数部に数字がない場合と、結果が有限値でない場合は `None`。
pub fn parse_leading_decimal(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

// =========================================================================
// RateBreakdown（送料内訳）
// =========================================================================

/// 送料内訳
///
/// # 不変条件
///
/// - `freight + cod_charges == taxable_amount`（浮動小数点誤差の範囲で）
/// - `taxable_amount + gst == rate`
/// - `freight >= 0`（キャリア見積額が非負の場合）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBreakdown {
    /// 顧客向け送料（GST 込み）
    pub rate:           f64,
    /// 運賃
    pub freight:        f64,
    /// 代引き手数料
    pub cod_charges:    f64,
    /// 課税対象額
    pub taxable_amount: f64,
    /// GST
    pub gst:            f64,
}

impl RateBreakdown {
    /// キャリア見積額から送料内訳を算出する
    pub fn calculate(carrier_total: f64, mode: PaymentMode, cod_amount: CodAmount) -> Self {
        let rate = carrier_total * MARKUP_FACTOR;
        let taxable_amount = rate / GST_FACTOR;
        let gst = rate - taxable_amount;

        let cod_charges = match mode {
            PaymentMode::Cod => COD_MIN_FEE.max(cod_amount.value() * COD_FEE_RATE) * MARKUP_FACTOR,
            PaymentMode::Prepaid => 0.0,
        };

        let freight = taxable_amount - cod_charges;
        let (freight, cod_charges) = if freight < 0.0 {
            (taxable_amount, 0.0)
        } else {
            (freight, cod_charges)
        };

        Self {
            rate,
            freight,
            cod_charges,
            taxable_amount,
            gst,
        }
    }

    /// 全項目を小数点以下 2 桁の文字列にする
    pub fn formatted(&self) -> FormattedRateBreakdown {
        FormattedRateBreakdown {
            rate:           format_amount(self.rate),
            freight:        format_amount(self.freight),
            cod_charges:    format_amount(self.cod_charges),
            taxable_amount: format_amount(self.taxable_amount),
            gst:            format_amount(self.gst),
        }
    }
}

/// 表示用の送料内訳（小数点以下 2 桁の文字列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRateBreakdown {
    pub rate:           String,
    pub freight:        String,
    pub cod_charges:    String,
    pub taxable_amount: String,
    pub gst:            String,
}

/// 金額を小数点以下 2 桁で整形する
///
/// 負のゼロは `0.00` とする。
fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}
