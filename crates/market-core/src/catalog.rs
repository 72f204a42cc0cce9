use crate::instrument::InstrumentSeed;

/// Instruments available when no custom catalog is supplied.
pub const DEFAULT_CATALOG: [InstrumentSeed; 45] = [
    InstrumentSeed::new("MSFT", "Microsoft Corp", "Tech", 415.50, 0.015).with_sentiment(0.5),
    InstrumentSeed::new("TSLA", "Tesla Inc", "Auto", 198.40, 0.035).with_sentiment(0.2),
    InstrumentSeed::new("T", "AT&T Inc", "Telecom", 17.20, 0.008).with_sentiment(0.1),
    InstrumentSeed::new("TCH", "TechVision Inc", "Tech", 145.20, 0.02).with_sentiment(0.8),
    InstrumentSeed::new("AIX", "Artificial Minds", "Tech", 175.60, 0.025).with_sentiment(0.9),
    InstrumentSeed::new("CYB", "CyberShield", "Tech", 120.30, 0.018).with_sentiment(0.4),
    InstrumentSeed::new("CHP", "MicroChip Inc", "Tech", 340.10, 0.022).with_sentiment(0.6),
    InstrumentSeed::new("SFT", "Cloud Soft", "Tech", 180.90, 0.015).with_sentiment(0.5),
    InstrumentSeed::new("QTM", "Quantum Core", "Tech", 512.40, 0.03).with_sentiment(0.7),
    InstrumentSeed::new("RBT", "Robo Dynamics", "Tech", 88.20, 0.028).with_sentiment(-0.2),
    InstrumentSeed::new("GRN", "GreenEnergy Corp", "Energy", 89.50, 0.02).with_sentiment(0.3),
    InstrumentSeed::new("SLR", "SolarGrid Systems", "Energy", 42.10, 0.025).with_sentiment(0.4),
    InstrumentSeed::new("UTL", "Urban Utilities", "Utilities", 55.75, 0.005).with_sentiment(0.1),
    InstrumentSeed::new("CLN", "Pure Water", "Utilities", 42.80, 0.006).with_sentiment(0.2),
    InstrumentSeed::new("NUC", "Fusion Power", "Energy", 102.30, 0.04).with_sentiment(0.6),
    InstrumentSeed::new("FNS", "FinSecure Bank", "Finance", 45.30, 0.01).with_sentiment(0.2),
    InstrumentSeed::new("REI", "RealEstate Trust", "Real Estate", 105.40, 0.012).with_sentiment(0.1),
    InstrumentSeed::new("INS", "SafeGuard Ins", "Finance", 140.75, 0.009),
    InstrumentSeed::new("CON", "BuildIt Corp", "Real Estate", 95.20, 0.015).with_sentiment(0.3),
    InstrumentSeed::new("BIO", "BioHealth Sys", "Health", 210.75, 0.018).with_sentiment(0.4),
    InstrumentSeed::new("MED", "MediCare Plus", "Health", 156.80, 0.01).with_sentiment(-0.1),
    InstrumentSeed::new("PHR", "PharmaGiant", "Health", 165.20, 0.012).with_sentiment(-0.2),
    InstrumentSeed::new("GEN", "Gene Therapies", "Health", 88.90, 0.05).with_sentiment(0.7),
    InstrumentSeed::new("RET", "Global Retail", "Consumer", 67.80, 0.012).with_sentiment(0.1),
    InstrumentSeed::new("FOD", "FastFood Chain", "Consumer", 34.20, 0.01).with_sentiment(-0.1),
    InstrumentSeed::new("ECM", "ShopEasy", "Consumer", 210.30, 0.015).with_sentiment(0.3),
    InstrumentSeed::new("LUX", "Luxe Brand", "Consumer", 560.00, 0.018).with_sentiment(0.1),
    InstrumentSeed::new("FSH", "TrendWear", "Consumer", 55.30, 0.02).with_sentiment(0.2),
    InstrumentSeed::new("BEV", "Fizz Beverages", "Consumer", 72.10, 0.01).with_sentiment(0.1),
    InstrumentSeed::new("GME", "GameVerse", "Consumer", 45.20, 0.04).with_sentiment(0.6),
    InstrumentSeed::new("ATF", "AutoFuture Motors", "Auto", 320.10, 0.03).with_sentiment(-0.4),
    InstrumentSeed::new("EVX", "Electric Volts", "Auto", 88.90, 0.035).with_sentiment(0.5),
    InstrumentSeed::new("AIR", "SkyHigh Airlines", "Travel", 120.50, 0.025).with_sentiment(-0.1),
    InstrumentSeed::new("SHP", "Ocean Freight", "Logistics", 32.50, 0.015).with_sentiment(-0.2),
    InstrumentSeed::new("LOG", "Global Logistics", "Logistics", 112.40, 0.012).with_sentiment(0.1),
    InstrumentSeed::new("CRY", "CryptoCoin X", "Crypto", 2_300.50, 0.08).with_sentiment(0.8),
    InstrumentSeed::new("GLD", "Gold Reserve", "Commodity", 1_850.00, 0.005).with_sentiment(0.2),
    InstrumentSeed::new("OIL", "Global Oil", "Commodity", 78.40, 0.02),
    InstrumentSeed::new("MIN", "Rare Earth Mining", "Commodity", 28.40, 0.03).with_sentiment(-0.3),
    InstrumentSeed::new("TEL", "Connect Telecom", "Telecom", 65.40, 0.01).with_sentiment(0.1),
    InstrumentSeed::new("SPC", "Orbit Tech", "Space", 450.60, 0.05).with_sentiment(0.9),
    InstrumentSeed::new("STM", "StreamLine Media", "Media", 18.90, 0.025).with_sentiment(-0.2),
    InstrumentSeed::new("AGR", "AgriCorp Global", "Agri", 44.20, 0.015).with_sentiment(0.1),
    InstrumentSeed::new("DEF", "Shield Defense", "Defense", 210.00, 0.01).with_sentiment(0.3),
    InstrumentSeed::new("EDU", "EduLearn Systems", "Education", 35.60, 0.01),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::DEFAULT_CATALOG;

    #[test]
    fn default_catalog_symbols_are_unique_and_prices_positive() {
        let symbols: HashSet<&str> = DEFAULT_CATALOG.iter().map(|seed| seed.symbol).collect();

        assert_eq!(symbols.len(), DEFAULT_CATALOG.len());
        assert!(DEFAULT_CATALOG.iter().all(|seed| seed.price > 0.0));
        assert!(DEFAULT_CATALOG
            .iter()
            .all(|seed| (0.0..=1.0).contains(&seed.volatility)));
    }
}
