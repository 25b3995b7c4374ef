pub mod mock_detector;
